//! 又拍云 REST API 客户端
//!
//! 签名: Authorization = "UPYUN " + Operator + ":" + base64(hmac-sha1(md5(Password), METHOD&URI&DATE))

use std::time::Duration;

use anyhow::{anyhow, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, RequestBuilder, Response};
use sha1::Sha1;

use super::types::*;
use crate::config::UpsConfig;
use crate::utils::encode_key;

type HmacSha1 = Hmac<Sha1>;

/// 单页最大数量
const LIST_LIMIT: &str = "1000";

/// 又拍云客户端
pub struct UpyunClient {
    client: Client,
    config: UpsConfig,
    /// md5(Password)
    password_md5: String,
}

impl UpyunClient {
    pub fn new(config: UpsConfig, timeout: Duration) -> Result<Self> {
        if config.bucket.is_empty() || config.operator.is_empty() {
            return Err(anyhow!("Bucket and Operator are required"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("build http client: {}", e))?;
        let password_md5 = format!("{:x}", md5::compute(config.password.as_bytes()));
        Ok(Self { client, config, password_md5 })
    }

    pub fn config(&self) -> &UpsConfig {
        &self.config
    }

    /// API地址 https://v0.api.upyun.com/{bucket}
    pub fn api_address(&self) -> String {
        format!("https://{}/{}", self.config.endpoint_host(), self.config.bucket)
    }

    /// 请求URI: /{bucket}/{encoded path}
    pub fn uri(&self, path: &str) -> String {
        format!("/{}/{}", self.config.bucket, encode_key(path.trim_start_matches('/')))
    }

    /// 生成签名
    pub fn sign(password_md5: &str, method: &str, uri: &str, date: &str) -> String {
        let string_to_sign = format!("{}&{}&{}", method, uri, date);
        let mut mac = HmacSha1::new_from_slice(password_md5.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let uri = self.uri(path);
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let signature = Self::sign(&self.password_md5, method.as_str(), &uri, &date);

        self.client
            .request(method, format!("https://{}{}", self.config.endpoint_host(), uri))
            .header("Date", date)
            .header("Authorization", format!("UPYUN {}:{}", self.config.operator, signature))
    }

    /// 非2xx响应转换为错误
    async fn check(resp: Response, action: &str, path: &str) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrResp>(&text)
            .map(|e| e.error_message())
            .unwrap_or(text);
        Err(anyhow!("{} {} failed: {} - {}", action, path, status, detail))
    }

    /// 列举目录一页
    pub async fn list_dir(&self, dir: &str, iter: &str) -> Result<ListResp> {
        let mut req = self.request(Method::GET, dir)
            .header("Accept", "application/json")
            .header("x-list-limit", LIST_LIMIT);
        if !iter.is_empty() {
            req = req.header("x-list-iter", iter);
        }
        let resp = Self::check(req.send().await?, "List", dir).await?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| anyhow!("parse list response: {} - {}", e, text))
    }

    /// 上传文件
    pub async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        let req = self.request(Method::PUT, path).body(data);
        Self::check(req.send().await?, "Put", path).await?;
        Ok(())
    }

    /// 创建目录
    pub async fn mkdir(&self, path: &str) -> Result<()> {
        let path = if path.ends_with('/') { path.to_string() } else { format!("{}/", path) };
        let req = self.request(Method::POST, &path)
            .header("folder", "true")
            .header("x-upyun-folder", "true");
        Self::check(req.send().await?, "Mkdir", &path).await?;
        Ok(())
    }

    /// 删除文件或空目录
    pub async fn delete(&self, path: &str) -> Result<()> {
        let req = self.request(Method::DELETE, path);
        Self::check(req.send().await?, "Delete", path).await?;
        Ok(())
    }
}
