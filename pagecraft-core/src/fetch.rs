//! Page fetch façade: a store behind a short-lived cache.

use crate::cache::{CacheKey, PageCache};
use crate::error::{FetchError, FetchResult};
use crate::page::PageDocument;
use crate::store::PageStore;
use std::sync::Arc;

pub struct PageFetcher<S: PageStore> {
    store: S,
    cache: PageCache,
}

impl<S: PageStore> PageFetcher<S> {
    pub fn new(store: S, cache: PageCache) -> Self {
        Self { store, cache }
    }

    /// Fetcher that always goes to the store.
    pub fn uncached(store: S) -> Self {
        Self::new(store, PageCache::disabled())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub async fn get_by_id(
        &self,
        page_id: &str,
        workspace_id: &str,
    ) -> FetchResult<Arc<PageDocument>> {
        if page_id.trim().is_empty() || workspace_id.trim().is_empty() {
            return Err(FetchError::NotFound(page_id.to_string()));
        }
        let key = CacheKey::by_id(page_id, workspace_id);
        if let Some(page) = self.cache.get(&key) {
            tracing::debug!("cache hit for page {} in {}", page_id, workspace_id);
            return Ok(page);
        }
        let page = Arc::new(self.store.fetch_by_id(page_id, workspace_id).await?);
        self.cache.insert(key, Arc::clone(&page));
        Ok(page)
    }

    pub async fn get_by_slug(
        &self,
        slug: &str,
        workspace_id: &str,
        auth_token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> FetchResult<Arc<PageDocument>> {
        if slug.trim().is_empty() || workspace_id.trim().is_empty() {
            return Err(FetchError::NotFound(slug.to_string()));
        }
        let key = CacheKey::by_slug(slug, workspace_id, auth_token, tenant_id);
        if let Some(page) = self.cache.get(&key) {
            tracing::debug!("cache hit for slug {} in {}", slug, workspace_id);
            return Ok(page);
        }
        let page = Arc::new(
            self.store
                .fetch_by_slug(slug, workspace_id, auth_token, tenant_id)
                .await?,
        );
        self.cache.insert(key, Arc::clone(&page));
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers from a fixed page list and counts calls; ids listed in
    /// `failing` fail transiently. With `required_token` set, slug lookups
    /// need that exact token.
    #[derive(Default)]
    struct CountingStore {
        pages: Vec<PageDocument>,
        failing: Mutex<Vec<String>>,
        required_token: Option<String>,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn with_pages(pages: Vec<PageDocument>) -> Self {
            Self {
                pages,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageStore for CountingStore {
        async fn fetch_by_id(
            &self,
            page_id: &str,
            workspace_id: &str,
        ) -> FetchResult<PageDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.lock().unwrap().iter().any(|id| id == page_id) {
                return Err(FetchError::Transient("store offline".into()));
            }
            self.pages
                .iter()
                .find(|p| p.id == page_id && p.workspace_id == workspace_id)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(page_id.into()))
        }

        async fn fetch_by_slug(
            &self,
            slug: &str,
            workspace_id: &str,
            auth_token: Option<&str>,
            _tenant_id: Option<&str>,
        ) -> FetchResult<PageDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(required) = &self.required_token {
                if auth_token != Some(required.as_str()) {
                    return Err(FetchError::Unauthorized(slug.into()));
                }
            }
            self.pages
                .iter()
                .find(|p| p.slug == slug && p.workspace_id == workspace_id)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(slug.into()))
        }
    }

    fn page(id: &str, slug: &str, workspace: &str) -> PageDocument {
        PageDocument {
            id: id.into(),
            slug: slug.into(),
            workspace_id: workspace.into(),
            ..Default::default()
        }
    }

    fn fetcher(pages: Vec<PageDocument>) -> PageFetcher<CountingStore> {
        PageFetcher::new(
            CountingStore::with_pages(pages),
            PageCache::new(Duration::from_secs(5), 16),
        )
    }

    #[tokio::test]
    async fn repeated_lookups_hit_the_cache() {
        let fetcher = fetcher(vec![page("p1", "home", "w1")]);
        let first = fetcher.get_by_slug("home", "w1", None, None).await.unwrap();
        let second = fetcher.get_by_slug("home", "w1", None, None).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.store().calls(), 1);

        fetcher.get_by_id("p1", "w1").await.unwrap();
        fetcher.get_by_id("p1", "w1").await.unwrap();
        assert_eq!(fetcher.store().calls(), 2);
    }

    #[tokio::test]
    async fn cache_does_not_leak_across_workspaces() {
        let fetcher = fetcher(vec![page("p1", "home", "w1")]);
        fetcher.get_by_slug("home", "w1", None, None).await.unwrap();
        let err = fetcher.get_by_slug("home", "w2", None, None).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fetcher.store().calls(), 2);
    }

    #[tokio::test]
    async fn cached_slug_is_not_served_to_other_credentials() {
        let store = CountingStore {
            pages: vec![page("p1", "hr", "w1")],
            required_token: Some("good".into()),
            ..Default::default()
        };
        let fetcher = PageFetcher::new(store, PageCache::new(Duration::from_secs(5), 16));

        let page = fetcher
            .get_by_slug("hr", "w1", Some("good"), Some("t1"))
            .await
            .unwrap();
        assert_eq!(page.id, "p1");

        let err = fetcher.get_by_slug("hr", "w1", None, Some("t1")).await.unwrap_err();
        assert_eq!(err, FetchError::Unauthorized("hr".into()));
        let err = fetcher
            .get_by_slug("hr", "w1", Some("forged"), Some("t1"))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Unauthorized("hr".into()));
        assert_eq!(fetcher.store().calls(), 3);

        fetcher.get_by_slug("hr", "w1", Some("good"), Some("t1")).await.unwrap();
        assert_eq!(fetcher.store().calls(), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let fetcher = fetcher(vec![page("p1", "home", "w1")]);
        fetcher.store().failing.lock().unwrap().push("p1".into());

        let err = fetcher.get_by_id("p1", "w1").await.unwrap_err();
        assert!(err.is_retryable());

        fetcher.store().failing.lock().unwrap().clear();
        assert_eq!(fetcher.get_by_id("p1", "w1").await.unwrap().id, "p1");
        assert_eq!(fetcher.store().calls(), 2);
        assert_eq!(fetcher.cache().len(), 1);
    }

    #[tokio::test]
    async fn blank_identity_is_not_found_without_store_call() {
        let fetcher = fetcher(vec![]);
        assert!(fetcher.get_by_id("", "w1").await.unwrap_err().is_not_found());
        assert!(fetcher.get_by_slug("home", " ", None, None).await.unwrap_err().is_not_found());
        assert_eq!(fetcher.store().calls(), 0);
    }

    #[tokio::test]
    async fn uncached_fetcher_always_calls_store() {
        let store = CountingStore::with_pages(vec![page("p1", "home", "w1")]);
        let fetcher = PageFetcher::uncached(store);
        fetcher.get_by_id("p1", "w1").await.unwrap();
        fetcher.get_by_id("p1", "w1").await.unwrap();
        assert_eq!(fetcher.store().calls(), 2);
    }
}
