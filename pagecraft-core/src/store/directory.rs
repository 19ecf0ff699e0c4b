use super::PageStore;
use crate::error::{ConfigError, FetchError, FetchResult};
use crate::page::PageDocument;
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;

/// In-memory store, optionally seeded from a directory of page JSON files.
/// Lookups are always scoped to the workspace.
#[derive(Default)]
pub struct DirectoryStore {
    /// (workspace_id, page_id) -> document
    pages: DashMap<(String, String), PageDocument>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` file in `dir`. Files that are not page documents
    /// are skipped with a warning.
    pub async fn open(dir: &Path) -> Result<Self, ConfigError> {
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        };
        let store = Self::new();
        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<PageDocument>(&text) {
                Ok(page) => store.insert(page),
                Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
            }
        }
        tracing::info!("loaded {} pages from {}", store.len(), dir.display());
        Ok(store)
    }

    /// Adds or replaces a document.
    pub fn insert(&self, page: PageDocument) {
        self.pages
            .insert((page.workspace_id.clone(), page.id.clone()), page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl PageStore for DirectoryStore {
    async fn fetch_by_id(&self, page_id: &str, workspace_id: &str) -> FetchResult<PageDocument> {
        self.pages
            .get(&(workspace_id.to_string(), page_id.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FetchError::NotFound(page_id.to_string()))
    }

    /// Auth and tenant are not checked: local files have no owner.
    async fn fetch_by_slug(
        &self,
        slug: &str,
        workspace_id: &str,
        _auth_token: Option<&str>,
        _tenant_id: Option<&str>,
    ) -> FetchResult<PageDocument> {
        self.pages
            .iter()
            .find(|entry| entry.key().0 == workspace_id && entry.value().slug == slug)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FetchError::NotFound(slug.to_string()))
    }
}
