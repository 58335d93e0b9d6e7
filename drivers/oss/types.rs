//! OSS data type definitions / OSS数据类型定义

use serde::Deserialize;

/// ListObjects response / 列举对象响应
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ListBucketResult {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub marker: String,
    #[serde(default)]
    pub next_marker: String,
    #[serde(default)]
    pub is_truncated: bool,
    #[serde(default)]
    pub contents: Vec<ObjectSummary>,
    #[serde(default)]
    pub common_prefixes: Vec<CommonPrefix>,
}

/// Object summary in a listing / 对象摘要
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectSummary {
    pub key: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub size: u64,
}

/// Common prefix (virtual directory) / 公共前缀
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CommonPrefix {
    pub prefix: String,
}

/// OSS error response / OSS错误响应
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct OssErrorResp {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,
}

impl OssErrorResp {
    pub fn error_message(&self) -> String {
        if self.request_id.is_empty() {
            format!("{}: {}", self.code, self.message)
        } else {
            format!("{}: {} (RequestId: {})", self.code, self.message, self.request_id)
        }
    }
}
