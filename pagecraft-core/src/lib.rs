//! # pagecraft-core
//!
//! Serving side of pagecraft: page documents, the fetch façade with its
//! short-lived cache, the comments/birthdays collaborators, the page route,
//! configuration and logging.
//!
//! ## Example
//! ```ignore
//! use pagecraft_core::{serve_page, DirectoryStore, PageCache, PageFetcher, PageRequest};
//!
//! let store = DirectoryStore::open("pages".as_ref()).await?;
//! let fetcher = PageFetcher::new(store, PageCache::new(Duration::from_secs(5), 256));
//! let request = PageRequest::by_id("p1", "w1");
//! let response = serve_page(&fetcher, None, &Default::default(), &request).await;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod page;
pub mod route;
pub mod social;
pub mod store;

pub use cache::{CacheKey, LookupKind, PageCache};
pub use config::{Config, StoreKind};
pub use error::{ConfigError, FetchError, FetchResult, SocialError, SocialResult};
pub use fetch::PageFetcher;
pub use page::PageDocument;
pub use route::{serve_page, serve_page_at, PageRequest, PageResponse, Session};
pub use social::{prefetch_leaf_data, LeafDataSource, NewComment, SocialClient};
pub use store::{AnyStore, DirectoryStore, HttpStore, PageStore};
