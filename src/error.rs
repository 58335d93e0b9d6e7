//! Gateway error taxonomy / 网关错误分类
//!
//! Every error is reported as HTTP 200 carrying `code: 500` and the message
//! below, the HTTP status itself is not used for error signaling.

use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::api::{write_json, ApiResponse};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration file missing or malformed / 配置文件读取失败
    #[error("ErrorConfig:{0}")]
    Config(String),
    /// Backend client could not be built / 客户端初始化失败
    #[error("ErrorInitClient:{0}")]
    InitClient(String),
    #[error("ErrorListObject:{0}")]
    ListObject(String),
    #[error("ErrorObjectDelete:{0}")]
    ObjectDelete(String),
    /// Multipart form problems / 上传表单错误
    #[error("ErrorUpload:{0}")]
    Upload(String),
    #[error("ErrorObjectUpload:{0}")]
    ObjectUpload(String),
    #[error("ErrorMkdir:{0}")]
    Mkdir(String),
    #[error("ErrorOperate:unsupported operate '{0}'")]
    Operate(String),
    #[error("token error")]
    Token,
}

/// Full error chain of an anyhow error / 完整错误链
pub fn detail(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::Token => write_json(&json!({
                "code": 500,
                "errors": "token error",
            })),
            other => write_json(&ApiResponse::<()>::error(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_messages() {
        assert_eq!(GatewayError::ListObject("denied".into()).to_string(), "ErrorListObject:denied");
        assert_eq!(GatewayError::Mkdir("x".into()).to_string(), "ErrorMkdir:x");
        assert_eq!(
            GatewayError::Operate("rename".into()).to_string(),
            "ErrorOperate:unsupported operate 'rename'"
        );
        assert_eq!(GatewayError::Token.to_string(), "token error");
    }

    #[test]
    fn test_detail_keeps_chain() {
        let err = Err::<(), _>(anyhow!("connection refused"))
            .context("PUT docs/a.txt")
            .unwrap_err();
        assert_eq!(detail(&err), "PUT docs/a.txt: connection refused");
    }
}
