//! 阿里云OSS HTTP 客户端
//!
//! 签名格式: Authorization = "OSS " + AccessKeyId + ":" + base64(hmac-sha1(AccessKeySecret, StringToSign))
//! StringToSign = VERB + "\n" + Content-MD5 + "\n" + Content-Type + "\n" + Date + "\n" + CanonicalizedResource

use std::time::Duration;

use anyhow::{anyhow, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response};
use sha1::Sha1;

use super::types::*;
use crate::config::OssConfig;
use crate::utils::encode_key;

type HmacSha1 = Hmac<Sha1>;

/// 单页最大数量
const MAX_KEYS: &str = "1000";

/// OSS客户端
pub struct OssClient {
    client: Client,
    config: OssConfig,
}

impl OssClient {
    pub fn new(config: OssConfig, timeout: Duration) -> Result<Self> {
        if config.bucket.is_empty() || config.endpoint_host().is_empty() {
            return Err(anyhow!("Bucket and Endpoint are required"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("build http client: {}", e))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OssConfig {
        &self.config
    }

    /// 获取GMT日期字符串
    fn gmt_date() -> String {
        Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    /// 构造待签名字符串（CanonicalizedResource 使用未编码的对象键）
    pub fn string_to_sign(method: &str, content_md5: &str, content_type: &str, date: &str, resource: &str) -> String {
        format!("{}\n{}\n{}\n{}\n{}", method, content_md5, content_type, date, resource)
    }

    /// 生成签名
    pub fn sign(secret: &str, string_to_sign: &str) -> String {
        let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    fn authorization(&self, method: &Method, content_type: &str, date: &str, key: &str) -> String {
        let resource = format!("/{}/{}", self.config.bucket, key);
        let string_to_sign = Self::string_to_sign(method.as_str(), "", content_type, date, &resource);
        let signature = Self::sign(&self.config.access_key_secret, &string_to_sign);
        format!("OSS {}:{}", self.config.access_key_id, signature)
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.config.api_address(), encode_key(key))
    }

    /// 发送签名请求，非2xx响应转换为错误
    async fn send(
        &self,
        method: Method,
        key: &str,
        query: &[(&str, &str)],
        content_type: &str,
        body: Option<Bytes>,
    ) -> Result<Response> {
        let date = Self::gmt_date();
        let auth = self.authorization(&method, content_type, &date, key);

        let mut req = self.client
            .request(method.clone(), self.url(key))
            .header("Date", &date)
            .header("Authorization", &auth);
        if !query.is_empty() {
            req = req.query(query);
        }
        if !content_type.is_empty() {
            req = req.header("Content-Type", content_type);
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let detail = quick_xml::de::from_str::<OssErrorResp>(&text)
                .map(|e| e.error_message())
                .unwrap_or(text);
            return Err(anyhow!("{} {} failed: {} - {}", method, key, status, detail));
        }
        Ok(resp)
    }

    /// 列举一页对象
    pub async fn list_objects(&self, prefix: &str, marker: &str) -> Result<ListBucketResult> {
        let query = [
            ("prefix", prefix),
            ("marker", marker),
            ("delimiter", "/"),
            ("max-keys", MAX_KEYS),
        ];
        let resp = self.send(Method::GET, "", &query, "", None).await?;
        let text = resp.text().await?;
        quick_xml::de::from_str(&text)
            .map_err(|e| anyhow!("parse ListObjects response: {} - {}", e, text))
    }

    /// 上传对象
    pub async fn put_object(&self, key: &str, data: Bytes) -> Result<()> {
        self.send(Method::PUT, key, &[], "application/octet-stream", Some(data)).await?;
        Ok(())
    }

    /// 删除对象
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        self.send(Method::DELETE, key, &[], "", None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_sign() {
        let s = OssClient::string_to_sign("PUT", "", "application/octet-stream", "Thu, 17 Nov 2005 18:49:58 GMT", "/bucket/docs/a.txt");
        assert_eq!(s, "PUT\n\napplication/octet-stream\nThu, 17 Nov 2005 18:49:58 GMT\n/bucket/docs/a.txt");
    }

    #[test]
    fn test_sign() {
        let s = OssClient::string_to_sign("PUT", "", "", "Thu, 17 Nov 2005 18:49:58 GMT", "/bucket/docs/a.txt");
        assert_eq!(OssClient::sign("secret", &s), "IONPDsYzGQx1X38BXkTYnmPMhKE=");
    }

    #[test]
    fn test_url_encodes_key() {
        let client = OssClient::new(OssConfig {
            access_key_id: "ak".to_string(),
            access_key_secret: "sk".to_string(),
            bucket: "b".to_string(),
            endpoint: "oss-cn-hangzhou.aliyuncs.com".to_string(),
            domain: String::new(),
        }, Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("docs/a b.txt"), "https://b.oss-cn-hangzhou.aliyuncs.com/docs/a%20b.txt");
        assert_eq!(client.url(""), "https://b.oss-cn-hangzhou.aliyuncs.com/");
    }

    #[test]
    fn test_missing_endpoint_is_error() {
        let config = OssConfig { bucket: "b".to_string(), ..Default::default() };
        assert!(OssClient::new(config, Duration::from_secs(1)).is_err());
    }
}
