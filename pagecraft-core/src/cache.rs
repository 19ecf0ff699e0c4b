//! Short-lived page lookup cache.

use crate::config::CacheConfig;
use crate::page::PageDocument;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Id,
    Slug,
}

/// Every scope the lookup itself is scoped by is part of the key, so entries
/// never cross workspaces, tenants or credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: LookupKind,
    pub workspace_id: String,
    pub tenant_id: Option<String>,
    /// SHA-256 of the auth token; the raw token is never held.
    pub credential: Option<String>,
    pub ident: String,
}

fn hash_credential(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl CacheKey {
    pub fn by_id(page_id: &str, workspace_id: &str) -> Self {
        Self {
            kind: LookupKind::Id,
            workspace_id: workspace_id.to_string(),
            tenant_id: None,
            credential: None,
            ident: page_id.to_string(),
        }
    }

    pub fn by_slug(
        slug: &str,
        workspace_id: &str,
        auth_token: Option<&str>,
        tenant_id: Option<&str>,
    ) -> Self {
        Self {
            kind: LookupKind::Slug,
            workspace_id: workspace_id.to_string(),
            tenant_id: tenant_id.map(str::to_string),
            credential: auth_token.map(hash_credential),
            ident: slug.to_string(),
        }
    }
}

struct CachedPage {
    page: Arc<PageDocument>,
    stored_at: Instant,
}

pub struct PageCache {
    entries: DashMap<CacheKey, CachedPage>,
    ttl: Duration,
    max_entries: usize,
}

impl PageCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.max_entries)
    }

    /// A cache that never holds anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, 0)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.max_entries > 0
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<PageDocument>> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Arc<PageDocument>> {
        if !self.is_enabled() {
            return None;
        }
        let fresh = {
            let entry = self.entries.get(key)?;
            if now.saturating_duration_since(entry.stored_at) < self.ttl {
                Some(Arc::clone(&entry.page))
            } else {
                None
            }
        };
        if fresh.is_none() {
            self.entries.remove(key);
        }
        fresh
    }

    pub fn insert(&self, key: CacheKey, page: Arc<PageDocument>) {
        self.insert_at(key, page, Instant::now());
    }

    pub fn insert_at(&self, key: CacheKey, page: Arc<PageDocument>, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.entries
                .retain(|_, cached| now.saturating_duration_since(cached.stored_at) < self.ttl);
            while self.entries.len() >= self.max_entries {
                let oldest = self
                    .entries
                    .iter()
                    .min_by_key(|entry| entry.value().stored_at)
                    .map(|entry| entry.key().clone());
                match oldest {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        self.entries.insert(
            key,
            CachedPage {
                page,
                stored_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(id: &str) -> Arc<PageDocument> {
        Arc::new(PageDocument {
            id: id.into(),
            ..Default::default()
        })
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = PageCache::new(Duration::from_secs(5), 10);
        let start = Instant::now();
        let key = CacheKey::by_id("p1", "w1");
        cache.insert_at(key.clone(), page("p1"), start);

        assert!(cache.get_at(&key, start + Duration::from_secs(4)).is_some());
        assert!(cache.get_at(&key, start + Duration::from_secs(5)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_are_scoped() {
        let cache = PageCache::new(Duration::from_secs(5), 10);
        cache.insert(CacheKey::by_slug("home", "w1", Some("tok"), Some("t1")), page("p1"));

        assert!(cache.get(&CacheKey::by_slug("home", "w1", Some("tok"), Some("t1"))).is_some());
        assert!(cache.get(&CacheKey::by_slug("home", "w2", Some("tok"), Some("t1"))).is_none());
        assert!(cache.get(&CacheKey::by_slug("home", "w1", Some("tok"), Some("t2"))).is_none());
        assert!(cache.get(&CacheKey::by_slug("home", "w1", Some("tok"), None)).is_none());
        assert!(cache.get(&CacheKey::by_slug("home", "w1", None, Some("t1"))).is_none());
        assert!(cache.get(&CacheKey::by_slug("home", "w1", Some("other"), Some("t1"))).is_none());
        assert!(cache.get(&CacheKey::by_id("home", "w1")).is_none());
    }

    #[test]
    fn credential_is_hashed() {
        let key = CacheKey::by_slug("home", "w1", Some("secret-token"), None);
        let credential = key.credential.unwrap();
        assert_eq!(credential.len(), 64);
        assert!(!credential.contains("secret-token"));
    }

    #[test]
    fn evicts_oldest_when_full() {
        let cache = PageCache::new(Duration::from_secs(60), 2);
        let start = Instant::now();
        cache.insert_at(CacheKey::by_id("a", "w"), page("a"), start);
        cache.insert_at(CacheKey::by_id("b", "w"), page("b"), start + Duration::from_secs(1));
        cache.insert_at(CacheKey::by_id("c", "w"), page("c"), start + Duration::from_secs(2));

        let now = start + Duration::from_secs(3);
        assert_eq!(cache.len(), 2);
        assert!(cache.get_at(&CacheKey::by_id("a", "w"), now).is_none());
        assert!(cache.get_at(&CacheKey::by_id("b", "w"), now).is_some());
        assert!(cache.get_at(&CacheKey::by_id("c", "w"), now).is_some());
    }

    #[test]
    fn zero_ttl_disables() {
        let cache = PageCache::new(Duration::ZERO, 10);
        let key = CacheKey::by_id("p1", "w1");
        cache.insert(key.clone(), page("p1"));
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0);
        assert!(!PageCache::disabled().is_enabled());
    }
}
