//! 又拍云数据类型定义

use serde::Deserialize;

/// 列举结束标记
pub const LIST_END_ITER: &str = "g2gCZAAEbmV4dGQAA2VvZg";

/// 目录列表响应（Accept: application/json）
#[derive(Debug, Deserialize, Default)]
pub struct ListResp {
    #[serde(default)]
    pub files: Vec<UpFile>,
    #[serde(default)]
    pub iter: String,
}

impl ListResp {
    /// 下一页标记，已结束返回None
    pub fn next_iter(&self) -> Option<String> {
        if self.iter.is_empty() || self.iter == LIST_END_ITER {
            None
        } else {
            Some(self.iter.clone())
        }
    }
}

/// 文件信息
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpFile {
    #[serde(default)]
    pub name: String,
    /// folder / F 为目录，其余为文件
    #[serde(default, rename = "type")]
    pub file_type: String,
    #[serde(default)]
    pub length: u64,
    /// Unix时间戳（秒）
    #[serde(default)]
    pub last_modified: i64,
}

impl UpFile {
    pub fn is_dir(&self) -> bool {
        self.file_type == "folder" || self.file_type == "F"
    }

    /// RFC3339 修改时间
    pub fn modified_rfc3339(&self) -> String {
        chrono::DateTime::from_timestamp(self.last_modified, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    }
}

/// 错误响应
#[derive(Debug, Deserialize, Default)]
pub struct ErrResp {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub id: String,
}

impl ErrResp {
    pub fn error_message(&self) -> String {
        format!("{} (code: {}, id: {})", self.msg, self.code, self.id)
    }
}
