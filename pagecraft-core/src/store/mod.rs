//! Backing stores for page documents.

mod directory;
mod http;

pub use directory::DirectoryStore;
pub use http::HttpStore;

use crate::config::{StoreConfig, StoreKind};
use crate::error::{ConfigError, FetchResult};
use crate::page::PageDocument;
use async_trait::async_trait;

/// Resolves page documents. Implementations report a missing page as
/// [`FetchError::NotFound`](crate::error::FetchError::NotFound), never as a
/// transient failure.
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn fetch_by_id(&self, page_id: &str, workspace_id: &str) -> FetchResult<PageDocument>;

    async fn fetch_by_slug(
        &self,
        slug: &str,
        workspace_id: &str,
        auth_token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> FetchResult<PageDocument>;
}

/// The store selected by configuration.
pub enum AnyStore {
    Directory(DirectoryStore),
    Http(HttpStore),
}

impl AnyStore {
    pub async fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        match config.kind {
            StoreKind::Directory => Ok(AnyStore::Directory(
                DirectoryStore::open(&config.directory).await?,
            )),
            StoreKind::Http => {
                let base_url = config.base_url.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("store.base_url is required for the http store".into())
                })?;
                Ok(AnyStore::Http(HttpStore::new(base_url, config.timeout())?))
            }
        }
    }
}

#[async_trait]
impl PageStore for AnyStore {
    async fn fetch_by_id(&self, page_id: &str, workspace_id: &str) -> FetchResult<PageDocument> {
        match self {
            AnyStore::Directory(store) => store.fetch_by_id(page_id, workspace_id).await,
            AnyStore::Http(store) => store.fetch_by_id(page_id, workspace_id).await,
        }
    }

    async fn fetch_by_slug(
        &self,
        slug: &str,
        workspace_id: &str,
        auth_token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> FetchResult<PageDocument> {
        match self {
            AnyStore::Directory(store) => {
                store.fetch_by_slug(slug, workspace_id, auth_token, tenant_id).await
            }
            AnyStore::Http(store) => {
                store.fetch_by_slug(slug, workspace_id, auth_token, tenant_id).await
            }
        }
    }
}
