use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use super::{write_json, ApiResponse};
use crate::error::{detail, GatewayError};
use crate::state::AppState;

/// Upload API descriptor / 上传接口信息
#[derive(Debug, Serialize)]
pub struct UploadApi {
    pub code: i32,
    pub utoken: String,
    pub url: String,
}

/// GET|POST /api/misc - 上传令牌与默认上传地址
pub async fn upload_api(State(state): State<Arc<AppState>>) -> Response {
    match state.load_config().await {
        Ok(config) => write_json(&UploadApi {
            code: 200,
            utoken: config.utoken,
            url: config.default,
        }),
        Err(e) => {
            tracing::error!("Failed to load config {:?}: {:#}", state.config_path, e);
            GatewayError::Config(detail(&e)).into_response()
        }
    }
}

/// GET /api/health - 健康检查
pub async fn health() -> Response {
    write_json(&ApiResponse::success(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
    })))
}
