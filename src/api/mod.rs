pub mod bucket;
pub mod login;
pub mod misc;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    response::Response,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const ALLOW_METHODS: &str = "GET, POST, PATCH, PUT, OPTIONS";
const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Uniform response envelope / 统一响应结构
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Success without data, message carries the payload / 无数据的成功响应
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
            data: None,
        }
    }
}

/// One listed entry / 列举条目
#[derive(Debug, Serialize)]
pub struct ListObject {
    /// Name relative to the queried prefix / 相对查询前缀的名称
    pub filename: String,
    pub prefix: String,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub create_time: Option<String>,
}

/// List envelope / 列举响应
#[derive(Serialize)]
pub struct ListResponse {
    pub code: i32,
    pub count: usize,
    pub message: String,
    pub data: Vec<ListObject>,
}

/// Write a JSON body with the gateway's fixed headers / 写出JSON响应
///
/// Always HTTP 200, errors travel in the envelope's `code`.
pub fn write_json<T: Serialize>(body: &T) -> Response {
    let buf = match serde_json::to_vec(body) {
        Ok(buf) => buf,
        Err(e) => {
            tracing::error!("Failed to encode response: {}", e);
            br#"{"code":500,"message":"ErrorEncode"}"#.to_vec()
        }
    };
    let len = buf.len();

    let mut resp = Response::new(Body::from(buf));
    let headers = resp.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    resp
}

/// Build the gateway router / 构建路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::OPTIONS,
        ]);

    Router::new()
        // Backend routes / 存储后端路由
        .route("/api/cos", get(bucket::cos_handler).post(bucket::cos_handler))
        .route("/api/oss", get(bucket::oss_handler).post(bucket::oss_handler))
        .route("/api/ups", get(bucket::ups_handler).post(bucket::ups_handler))
        .route("/api/storage", get(bucket::storage_handler).post(bucket::storage_handler))
        // Login / 登录
        .route("/login", get(login::login).post(login::login))
        .route("/api/login", get(login::login).post(login::login))
        // Upload API and health / 上传接口与健康检查
        .route("/api/misc", get(misc::upload_api).post(misc::upload_api))
        .route("/api/health", get(misc::health))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_write_json_headers() {
        let resp = write_json(&ApiResponse::<()>::message("ok"));
        assert_eq!(resp.status(), 200);
        let headers = resp.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::CONTENT_TYPE], JSON_CONTENT_TYPE);

        let expected = r#"{"code":200,"message":"ok"}"#;
        assert_eq!(headers[header::CONTENT_LENGTH], expected.len().to_string().as_str());
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], expected.as_bytes());
    }

    #[test]
    fn test_list_object_nulls() {
        let obj = ListObject {
            filename: "sub/".to_string(),
            prefix: "docs/".to_string(),
            is_dir: true,
            size: None,
            create_time: None,
        };
        let value = serde_json::to_value(&obj).unwrap();
        assert!(value["size"].is_null());
        assert!(value["create_time"].is_null());
        assert_eq!(value["is_dir"], true);
    }

    #[test]
    fn test_error_envelope() {
        let value = serde_json::to_value(ApiResponse::<()>::error("ErrorMkdir:x")).unwrap();
        assert_eq!(value["code"], 500);
        assert_eq!(value["message"], "ErrorMkdir:x");
        assert!(value.get("data").is_none());
    }
}
