//! OSS StorageDriver 实现

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use super::client::OssClient;
use super::types::ListBucketResult;
use crate::config::OssConfig;
use crate::storage::{list_all, Entry, Page, StorageDriver};
use crate::utils::resolve_domain;

/// OSS驱动
pub struct OssDriver {
    client: OssClient,
}

impl OssDriver {
    pub fn new(config: OssConfig, timeout: Duration) -> Result<Self> {
        Ok(Self { client: OssClient::new(config, timeout)? })
    }

    async fn list_page(&self, prefix: &str, marker: String) -> Result<Page> {
        let result = self.client.list_objects(prefix, &marker).await?;
        Ok(to_page(prefix, result))
    }
}

/// 单页列举结果转换为 Page，跳过目录自身的占位对象
fn to_page(prefix: &str, result: ListBucketResult) -> Page {
    let mut entries: Vec<Entry> = result.common_prefixes
        .into_iter()
        .map(|cp| Entry::dir(cp.prefix))
        .collect();
    entries.extend(
        result.contents
            .into_iter()
            .filter(|obj| obj.key != prefix)
            .map(|obj| Entry::file(obj.key, obj.size, obj.last_modified)),
    );

    let next = if result.is_truncated { Some(result.next_marker) } else { None };
    Page { entries, next }
}

#[async_trait]
impl StorageDriver for OssDriver {
    fn name(&self) -> &str {
        "OSS"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<Entry>> {
        tracing::debug!("OSS list: bucket={}, prefix={}", self.client.config().bucket, prefix);
        // 首个marker为前缀本身
        list_all(prefix.to_string(), |marker| self.list_page(prefix, marker)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!("OSS delete: {}", path);
        self.client.delete_object(path).await
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        tracing::debug!("OSS put: key={}, size={}", key, data.len());
        self.client.put_object(key, data).await
    }

    async fn create_dir(&self, key: &str) -> Result<()> {
        tracing::debug!("OSS mkdir: {}", key);
        self.client.put_object(key, Bytes::new()).await
    }

    fn domain(&self) -> String {
        let config = self.client.config();
        resolve_domain(&config.domain, &config.api_address())
    }
}
