use super::PageStore;
use crate::error::{ConfigError, FetchError, FetchResult};
use crate::page::PageDocument;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;

pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Page store backed by the pages REST API.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::Invalid(format!("store.base_url {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "store.base_url {} cannot hold a path",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str], workspace_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair("workspaceId", workspace_id);
        url
    }

    async fn get(
        &self,
        url: Url,
        ident: &str,
        auth_token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> FetchResult<PageDocument> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(tenant) = tenant_id {
            request = request.header(TENANT_HEADER, tenant);
        }

        tracing::debug!("GET {}", url);
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<PageDocument>()
                .await
                .map_err(|e| FetchError::InvalidDocument(e.to_string())),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(ident.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(FetchError::Unauthorized(ident.to_string()))
            }
            status => Err(FetchError::Transient(format!("{} returned {}", url.path(), status))),
        }
    }
}

#[async_trait]
impl PageStore for HttpStore {
    async fn fetch_by_id(&self, page_id: &str, workspace_id: &str) -> FetchResult<PageDocument> {
        let url = self.endpoint(&["pages", page_id], workspace_id);
        self.get(url, page_id, None, None).await
    }

    async fn fetch_by_slug(
        &self,
        slug: &str,
        workspace_id: &str,
        auth_token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> FetchResult<PageDocument> {
        let url = self.endpoint(&["pages", "slug", slug], workspace_id);
        self.get(url, slug, auth_token, tenant_id).await
    }
}
