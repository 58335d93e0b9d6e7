//! 又拍云 StorageDriver 实现
//!
//! 又拍云是真实目录结构，列举按目录路径进行，返回的名称为相对名称，
//! 这里按目录路径重新拼出完整键。

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use super::client::UpyunClient;
use super::types::ListResp;
use crate::config::UpsConfig;
use crate::storage::{list_all, Entry, Page, StorageDriver};
use crate::utils::{normalize_prefix, resolve_domain};

/// 又拍云驱动
pub struct UpyunDriver {
    client: UpyunClient,
}

impl UpyunDriver {
    pub fn new(config: UpsConfig, timeout: Duration) -> Result<Self> {
        Ok(Self { client: UpyunClient::new(config, timeout)? })
    }

    async fn list_page(&self, dir: &str, iter: String) -> Result<Page> {
        let resp = self.client.list_dir(dir, &iter).await?;
        Ok(to_page(dir, resp))
    }
}

/// 相对名称按目录拼回完整键，目录以 / 结尾
fn to_page(dir: &str, resp: ListResp) -> Page {
    let next = resp.next_iter();
    let entries = resp.files
        .into_iter()
        .map(|f| {
            if f.is_dir() {
                Entry::dir(format!("{}{}/", dir, f.name))
            } else {
                let modified = f.modified_rfc3339();
                Entry::file(format!("{}{}", dir, f.name), f.length, modified)
            }
        })
        .collect();

    Page { entries, next }
}

#[async_trait]
impl StorageDriver for UpyunDriver {
    fn name(&self) -> &str {
        "UPYUN"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<Entry>> {
        let dir = normalize_prefix(prefix);
        tracing::debug!("UPYUN list: bucket={}, dir=/{}", self.client.config().bucket, dir);
        list_all(String::new(), |iter| self.list_page(&dir, iter)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!("UPYUN delete: {}", path);
        self.client.delete(path).await
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        tracing::debug!("UPYUN put: key={}, size={}", key, data.len());
        self.client.put(key, data).await
    }

    async fn create_dir(&self, key: &str) -> Result<()> {
        tracing::debug!("UPYUN mkdir: {}", key);
        self.client.mkdir(key).await
    }

    fn domain(&self) -> String {
        resolve_domain(&self.client.config().domain, &self.client.api_address())
    }
}
