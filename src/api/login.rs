use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use super::{write_json, ApiResponse};
use crate::error::{detail, GatewayError};
use crate::state::AppState;
use crate::utils::secure_eq;

/// GET|POST /login, /api/login
///
/// 令牌与配置中的 Token 一致时原样返回
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Response {
    let config = match state.load_config().await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config {:?}: {:#}", state.config_path, e);
            return GatewayError::Config(detail(&e)).into_response();
        }
    };

    let token = params.remove("token").unwrap_or_default();
    // an unset Token never matches / 未配置 Token 时一律拒绝
    if config.token.is_empty() || !secure_eq(&token, &config.token) {
        tracing::warn!("Login rejected: token error");
        return GatewayError::Token.into_response();
    }

    write_json(&ApiResponse::success(token))
}
