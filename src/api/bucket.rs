//! Bucket operation handlers / 存储桶操作处理
//!
//! Every request reloads the configuration, builds a driver for the selected
//! backend and performs exactly one operation.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use super::{write_json, ApiResponse, ListObject, ListResponse};
use crate::error::{detail, GatewayError};
use crate::state::AppState;
use crate::storage::DriverBox;
use crate::utils::{dir_key, normalize_prefix, public_url, relative_name};

/// Operation query / 操作参数
///
/// Extracted through a map so repeated keys keep the last value instead of
/// failing extraction outside the envelope.
#[derive(Debug, Default)]
pub struct OperateQuery {
    pub operate: Option<String>,
    pub prefix: Option<String>,
    pub path: Option<String>,
    pub dirname: Option<String>,
}

impl From<HashMap<String, String>> for OperateQuery {
    fn from(mut params: HashMap<String, String>) -> Self {
        Self {
            operate: params.remove("operate"),
            prefix: params.remove("prefix"),
            path: params.remove("path"),
            dirname: params.remove("dirname"),
        }
    }
}

/// GET|POST /api/cos
pub async fn cos_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    handle(state, Some("cos"), params.into(), request).await
}

/// GET|POST /api/oss
pub async fn oss_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    handle(state, Some("oss"), params.into(), request).await
}

/// GET|POST /api/ups
pub async fn ups_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    handle(state, Some("ups"), params.into(), request).await
}

/// GET|POST /api/storage - backend chosen by configuration / 按配置选择后端
pub async fn storage_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    handle(state, None, params.into(), request).await
}

async fn handle(
    state: Arc<AppState>,
    backend: Option<&str>,
    query: OperateQuery,
    request: Request,
) -> Response {
    let operate = query.operate.clone().unwrap_or_default();
    match dispatch(&state, backend, query, request).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!("operate {:?} failed: {}", operate, e);
            e.into_response()
        }
    }
}

async fn dispatch(
    state: &Arc<AppState>,
    backend: Option<&str>,
    query: OperateQuery,
    request: Request,
) -> Result<Response, GatewayError> {
    let config = state.load_config().await.map_err(|e| {
        tracing::error!("Failed to load config {:?}: {:#}", state.config_path, e);
        GatewayError::Config(detail(&e))
    })?;

    let backend = match backend.or_else(|| config.default_backend()) {
        Some(b) => b.to_string(),
        None => return Err(GatewayError::InitClient("no storage backend configured".to_string())),
    };
    let driver = state
        .storage_manager
        .create_driver(&backend, &config)
        .await
        .map_err(|e| GatewayError::InitClient(detail(&e)))?;

    let operate = query.operate.as_deref().unwrap_or_default();
    tracing::debug!("{} operate={}", driver.name(), operate);

    match operate {
        "list" => list(&driver, query.prefix.unwrap_or_default()).await,
        "delete" => {
            let path = query.path.unwrap_or_default();
            driver
                .delete(&path)
                .await
                .map_err(|e| GatewayError::ObjectDelete(detail(&e)))?;
            Ok(write_json(&ApiResponse::<()>::message("ok")))
        }
        "upload" => upload(state, &driver, query.prefix, request).await,
        "mkdir" => {
            let key = dir_key(
                query.prefix.as_deref().unwrap_or_default(),
                query.dirname.as_deref().unwrap_or_default(),
            );
            driver
                .create_dir(&key)
                .await
                .map_err(|e| GatewayError::Mkdir(detail(&e)))?;
            Ok(write_json(&ApiResponse::<()>::message("ok")))
        }
        "domain" => Ok(write_json(&ApiResponse::<()>::message(driver.domain()))),
        other => Err(GatewayError::Operate(other.to_string())),
    }
}

/// List one level under prefix / 列举前缀下一层
///
/// The prefix is normalized to a directory form ("docs" lists "docs/") before
/// it reaches any driver.
async fn list(driver: &DriverBox, prefix: String) -> Result<Response, GatewayError> {
    let prefix = normalize_prefix(&prefix);
    let entries = driver
        .list(&prefix)
        .await
        .map_err(|e| GatewayError::ListObject(detail(&e)))?;

    let data: Vec<ListObject> = entries
        .into_iter()
        .filter_map(|entry| {
            let filename = relative_name(&entry.key, &prefix).to_string();
            // the directory's own marker / 目录自身占位
            if filename.is_empty() {
                return None;
            }
            Some(ListObject {
                filename,
                prefix: prefix.clone(),
                is_dir: entry.is_dir,
                size: entry.size,
                create_time: entry.modified,
            })
        })
        .collect();

    Ok(write_json(&ListResponse {
        code: 200,
        count: data.len(),
        message: driver.domain(),
        data,
    }))
}

/// Store the multipart `file` field at prefix + filename / 上传文件
///
/// A `prefix` form field wins over the query parameter.
async fn upload(
    state: &Arc<AppState>,
    driver: &DriverBox,
    query_prefix: Option<String>,
    request: Request,
) -> Result<Response, GatewayError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| GatewayError::Upload(e.body_text()))?;

    let mut file: Option<(String, Bytes)> = None;
    let mut prefix = query_prefix;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::Upload(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| GatewayError::Upload("missing file name".to_string()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| GatewayError::Upload(e.body_text()))?;
                file = Some((filename, data));
            }
            Some("prefix") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| GatewayError::Upload(e.body_text()))?;
                prefix = Some(value);
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| GatewayError::Upload("no such file: file".to_string()))?;
    let prefix = prefix.unwrap_or_default();
    let key = format!("{}{}", prefix, filename);

    driver
        .put(&key, data)
        .await
        .map_err(|e| GatewayError::ObjectUpload(detail(&e)))?;

    tracing::info!("Uploaded {} via {}", key, driver.name());
    Ok(write_json(&ApiResponse::success(public_url(&driver.domain(), &prefix, &filename))))
}
