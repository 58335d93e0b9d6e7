//! Gateway configuration module / 网关配置模块
//!
//! Configuration is loaded from a YAML file (config.yaml by default).
//! It is re-read on every request so credential changes take effect without a restart.
//! 每次请求都会重新读取配置文件

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config path / 配置文件路径环境变量
pub const CONFIG_ENV: &str = "GATEWAY_CONFIG";

const DEFAULT_PORT: &str = "8080";
const DEFAULT_TIMEOUT_SECS: u64 = 100;

/// Gateway configuration / 网关配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayConfig {
    /// Listen port, 8080 or ":8080" / 监听端口
    #[serde(default, deserialize_with = "port_string")]
    pub port: String,
    /// Listen host / 监听地址
    #[serde(default)]
    pub host: Option<String>,
    /// Default upload URL / 默认上传地址
    #[serde(default)]
    pub default: String,
    /// Shared secret for /login / 登录令牌
    #[serde(default)]
    pub token: String,
    /// Upload token / 上传令牌
    #[serde(default, rename = "UToken")]
    pub utoken: String,
    /// Backend for the /api/storage route / 默认存储后端
    #[serde(default)]
    pub backend: Option<String>,
    /// Backend call timeout in seconds / 后端调用超时（秒）
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub cos: Option<CosConfig>,
    #[serde(default)]
    pub oss: Option<OssConfig>,
    #[serde(default)]
    pub ups: Option<UpsConfig>,
}

/// Tencent Cloud COS credentials / 腾讯云COS配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CosConfig {
    /// API密钥ID
    #[serde(rename = "SecretID")]
    pub secret_id: String,
    /// API密钥私钥
    #[serde(rename = "SecretKey")]
    pub secret_key: String,
    /// 存储桶名称 规则 test-1234567889
    #[serde(rename = "Bucket")]
    pub bucket: String,
    /// 存储桶所属地域 规则 ap-nanjing
    #[serde(rename = "Region")]
    pub region: String,
    /// 自定义域名
    #[serde(rename = "Domain", default)]
    pub domain: String,
}

impl CosConfig {
    /// API address (bucket access domain) / API地址
    pub fn api_address(&self) -> String {
        format!("https://{}.cos.{}.myqcloud.com", self.bucket, self.region)
    }
}

/// Alibaba Cloud OSS credentials / 阿里云OSS配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OssConfig {
    /// AccessKey ID
    #[serde(rename = "Ak")]
    pub access_key_id: String,
    /// AccessKey Secret
    #[serde(rename = "Sk")]
    pub access_key_secret: String,
    #[serde(rename = "Bucket")]
    pub bucket: String,
    /// 外网访问地域节点(非Bucket域名)
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    /// 自定义域名(Bucket域名或自定义)
    #[serde(rename = "Domain", default)]
    pub domain: String,
}

impl OssConfig {
    /// Endpoint host without scheme / 去掉协议头的节点地址
    pub fn endpoint_host(&self) -> &str {
        self.endpoint
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
    }

    pub fn api_address(&self) -> String {
        format!("https://{}.{}", self.bucket, self.endpoint_host())
    }
}

/// UPYUN storage credentials / 又拍云配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsConfig {
    /// 服务名称
    #[serde(rename = "Bucket")]
    pub bucket: String,
    /// 授权的操作员名称
    #[serde(rename = "Operator")]
    pub operator: String,
    /// 授权的操作员密码
    #[serde(rename = "Password")]
    pub password: String,
    /// 加速域名
    #[serde(rename = "Domain", default)]
    pub domain: String,
    /// REST API host / API地址
    #[serde(rename = "Endpoint", default)]
    pub endpoint: Option<String>,
}

impl UpsConfig {
    pub fn endpoint_host(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or("v0.api.upyun.com")
    }
}

impl GatewayConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn bind_address(&self) -> String {
        let host = self.host.as_deref().filter(|h| !h.is_empty()).unwrap_or("0.0.0.0");
        let port = self.port.trim().trim_start_matches(':');
        let port = if port.is_empty() { DEFAULT_PORT } else { port };
        format!("{}:{}", host, port)
    }

    /// Backend call timeout / 后端调用超时
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.filter(|t| *t > 0).unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Backend used when the route does not name one / 路由未指定时使用的后端
    pub fn default_backend(&self) -> Option<&str> {
        if let Some(backend) = self.backend.as_deref().filter(|b| !b.is_empty()) {
            return Some(backend);
        }
        if self.cos.is_some() {
            Some("cos")
        } else if self.oss.is_some() {
            Some("oss")
        } else if self.ups.is_some() {
            Some("ups")
        } else {
            None
        }
    }
}

/// Accept the port as either a YAML string or number / 端口可以是字符串或数字
fn port_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("invalid Port: {:?}", other))),
    }
}

/// Get the config file path / 获取配置文件路径
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"))
}

/// Load configuration from file / 加载配置文件
///
/// A missing or malformed file is always an error, never an empty configuration.
pub fn load_config(path: &Path) -> Result<GatewayConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {:?}", path))?;
    parse_config(&content)
}

/// Parse configuration text / 解析配置内容
pub fn parse_config(content: &str) -> Result<GatewayConfig> {
    if content.trim().is_empty() {
        return Err(anyhow!("read config file error: empty configuration"));
    }
    serde_yaml::from_str(content).map_err(|e| anyhow!("read config file error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
Port: ":8081"
Default: "https://example.com/api/cos"
Token: "secret"
UToken: "upload-secret"
Cos:
  SecretID: "id"
  SecretKey: "key"
  Bucket: "test-1234567889"
  Region: "ap-nanjing"
  Domain: ""
Ups:
  Bucket: "svc"
  Operator: "op"
  Password: "pw"
  Domain: "https://cdn.example.com/"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.token, "secret");
        assert_eq!(config.utoken, "upload-secret");
        assert_eq!(config.default, "https://example.com/api/cos");
        let cos = config.cos.as_ref().unwrap();
        assert_eq!(cos.api_address(), "https://test-1234567889.cos.ap-nanjing.myqcloud.com");
        assert!(config.oss.is_none());
        assert_eq!(config.ups.as_ref().unwrap().endpoint_host(), "v0.api.upyun.com");
    }

    #[test]
    fn test_bind_address() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8081");

        let config = parse_config("Port: 9000\nToken: t\n").unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");

        let config = GatewayConfig {
            host: Some("127.0.0.1".to_string()),
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_backend() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.default_backend(), Some("cos"));

        let config = GatewayConfig::default();
        assert_eq!(config.default_backend(), None);

        let config = GatewayConfig {
            backend: Some("ups".to_string()),
            ..Default::default()
        };
        assert_eq!(config.default_backend(), Some("ups"));
    }

    #[test]
    fn test_timeout() {
        assert_eq!(GatewayConfig::default().timeout(), Duration::from_secs(100));
        let config = GatewayConfig { timeout: Some(5), ..Default::default() };
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_oss_endpoint_host() {
        let oss = OssConfig {
            bucket: "b".to_string(),
            endpoint: "https://oss-cn-hangzhou.aliyuncs.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(oss.endpoint_host(), "oss-cn-hangzhou.aliyuncs.com");
        assert_eq!(oss.api_address(), "https://b.oss-cn-hangzhou.aliyuncs.com");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("config.yaml")).is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"Port: [unterminated").unwrap();
        assert!(load_config(&path).is_err());

        std::fs::write(&path, "").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.ups.unwrap().operator, "op");
    }
}
