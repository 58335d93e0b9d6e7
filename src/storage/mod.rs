use async_trait::async_trait;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Object entry returned by a listing / 列举返回的对象条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Full object key (directories end with /) / 完整对象键
    pub key: String,
    pub is_dir: bool,
    /// None for directories / 目录为 None
    pub size: Option<u64>,
    /// Last modified time, None for directories / 最后修改时间
    pub modified: Option<String>,
}

impl Entry {
    pub fn file(key: impl Into<String>, size: u64, modified: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_dir: false,
            size: Some(size),
            modified: Some(modified.into()),
        }
    }

    pub fn dir(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_dir: true,
            size: None,
            modified: None,
        }
    }
}

/// Storage driver interface, one implementation per backend / 存储驱动接口
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Driver name / 驱动名称
    fn name(&self) -> &str;

    /// List objects and common prefixes directly under prefix (delimiter /),
    /// following continuation markers until the listing is exhausted.
    /// 列出前缀下一层的对象与目录，自动翻页
    async fn list(&self, prefix: &str) -> Result<Vec<Entry>>;

    /// Delete the object at an absolute key / 删除对象
    async fn delete(&self, path: &str) -> Result<()>;

    /// Put complete object data / 上传完整对象
    async fn put(&self, key: &str, data: bytes::Bytes) -> Result<()>;

    /// Create directory marker / 创建目录
    async fn create_dir(&self, key: &str) -> Result<()>;

    /// Public base URL / 对外访问域名
    fn domain(&self) -> String;
}

/// One page of a paginated listing / 分页列举的一页
#[derive(Debug, Default)]
pub struct Page {
    pub entries: Vec<Entry>,
    /// Continuation marker, None when the listing is exhausted / 下一页标记
    pub next: Option<String>,
}

/// Follow continuation markers until the listing is exhausted / 自动翻页直到结束
///
/// `fetch` receives the marker of the page to load (`first` for the first page).
pub async fn list_all<F, Fut>(first: String, mut fetch: F) -> Result<Vec<Entry>>
where
    F: FnMut(String) -> Fut + Send,
    Fut: Future<Output = Result<Page>> + Send,
{
    let mut entries = Vec::new();
    let mut marker = first;
    let mut pages = 0usize;

    loop {
        let page = fetch(marker.clone()).await?;
        pages += 1;
        entries.extend(page.entries);

        match page.next {
            Some(next) if !next.is_empty() => {
                if next == marker {
                    return Err(anyhow!("listing marker did not advance: {}", next));
                }
                marker = next;
            }
            _ => break,
        }
    }

    tracing::debug!("listing finished: {} entries in {} pages", entries.len(), pages);
    Ok(entries)
}

pub mod manager;

pub use manager::{StorageManager, DriverFactory, DriverBox};

#[cfg(test)]
mod tests {
    use super::*;

    fn page(keys: &[&str], next: Option<&str>) -> Page {
        Page {
            entries: keys.iter().map(|k| Entry::file(*k, 1, "t")).collect(),
            next: next.map(|n| n.to_string()),
        }
    }

    #[tokio::test]
    async fn test_list_all_follows_markers() {
        let mut seen = Vec::new();
        let entries = list_all("docs/".to_string(), |marker| {
            seen.push(marker.clone());
            let result = match marker.as_str() {
                "docs/" => page(&["docs/a", "docs/b"], Some("docs/b")),
                "docs/b" => page(&["docs/c"], Some("docs/c")),
                _ => page(&["docs/d"], None),
            };
            async move { Ok(result) }
        }).await.unwrap();

        let keys: Vec<_> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["docs/a", "docs/b", "docs/c", "docs/d"]);
        assert_eq!(seen, vec!["docs/", "docs/b", "docs/c"]);
    }

    #[tokio::test]
    async fn test_list_all_empty_marker_stops() {
        let entries = list_all(String::new(), |_| async { Ok(page(&["a"], Some(""))) })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_stuck_marker_is_error() {
        let result = list_all("m".to_string(), |_| async { Ok(page(&["a"], Some("m"))) }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_all_propagates_error() {
        let result = list_all(String::new(), |_| async { Err::<Page, _>(anyhow!("boom")) }).await;
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn test_entry_constructors() {
        let dir = Entry::dir("docs/");
        assert!(dir.is_dir);
        assert_eq!(dir.size, None);
        assert_eq!(dir.modified, None);

        let file = Entry::file("docs/a", 3, "2024-01-01T00:00:00Z");
        assert_eq!(file.size, Some(3));
    }
}
