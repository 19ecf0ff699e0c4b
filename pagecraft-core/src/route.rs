//! Page route: turns a request into a rendered page, a not-found, or a
//! retryable failure. Upstream errors never reach the caller raw.

use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::page::PageDocument;
use crate::social::{prefetch_leaf_data, LeafDataSource};
use crate::store::PageStore;
use chrono::{DateTime, Utc};
use pagecraft_render::{RenderContext, RenderOptions};
use std::sync::Arc;

/// Identity taken from the caller's session cookie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub auth_token: Option<String>,
    pub tenant_id: Option<String>,
    pub workspace_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub slug: Option<String>,
    pub page_id: Option<String>,
    pub workspace_id: Option<String>,
    pub session: Option<Session>,
}

impl PageRequest {
    pub fn by_id(page_id: &str, workspace_id: &str) -> Self {
        Self {
            page_id: Some(page_id.to_string()),
            workspace_id: Some(workspace_id.to_string()),
            ..Default::default()
        }
    }

    pub fn by_slug(slug: &str, session: Session) -> Self {
        Self {
            slug: Some(slug.to_string()),
            session: Some(session),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse {
    Rendered { title: String, html: String },
    NotFound,
    /// The page may exist but could not be loaded right now.
    Unavailable { reason: String },
}

impl PageResponse {
    pub fn status(&self) -> u16 {
        match self {
            PageResponse::Rendered { .. } => 200,
            PageResponse::NotFound => 404,
            PageResponse::Unavailable { .. } => 503,
        }
    }
}

impl From<FetchError> for PageResponse {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(_) | FetchError::Unauthorized(_) => PageResponse::NotFound,
            FetchError::Transient(reason) | FetchError::InvalidDocument(reason) => {
                PageResponse::Unavailable { reason }
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn serve_page<S: PageStore>(
    fetcher: &PageFetcher<S>,
    social: Option<&dyn LeafDataSource>,
    options: &RenderOptions,
    request: &PageRequest,
) -> PageResponse {
    serve_page_at(fetcher, social, options, request, Utc::now()).await
}

/// [`serve_page`] with an explicit clock.
pub async fn serve_page_at<S: PageStore>(
    fetcher: &PageFetcher<S>,
    social: Option<&dyn LeafDataSource>,
    options: &RenderOptions,
    request: &PageRequest,
    now: DateTime<Utc>,
) -> PageResponse {
    let page = match resolve(fetcher, request).await {
        Some(Ok(page)) => page,
        Some(Err(err)) => {
            if err.is_not_found() {
                tracing::debug!("{}", err);
            } else {
                tracing::warn!("{}", err);
            }
            return err.into();
        }
        None => {
            tracing::debug!("request carries no page identity");
            return PageResponse::NotFound;
        }
    };

    let leaf_data = match social {
        Some(source) => prefetch_leaf_data(source, &page).await,
        None => Default::default(),
    };
    let ctx = RenderContext::at(now)
        .with_options(options.clone())
        .with_leaf_data(leaf_data);

    tracing::info!("rendering page {} ({})", page.id, page.title());
    PageResponse::Rendered {
        title: page.title().to_string(),
        html: page.render_html(&ctx),
    }
}

/// `None` when the request does not identify a page.
async fn resolve<S: PageStore>(
    fetcher: &PageFetcher<S>,
    request: &PageRequest,
) -> Option<Result<Arc<PageDocument>, FetchError>> {
    if let (Some(page_id), Some(workspace_id)) =
        (non_blank(&request.page_id), non_blank(&request.workspace_id))
    {
        return Some(fetcher.get_by_id(page_id, workspace_id).await);
    }

    let slug = non_blank(&request.slug)?;
    let session = request.session.as_ref()?;
    let workspace_id =
        non_blank(&request.workspace_id).or_else(|| non_blank(&session.workspace_id))?;
    Some(
        fetcher
            .get_by_slug(
                slug,
                workspace_id,
                session.auth_token.as_deref(),
                session.tenant_id.as_deref(),
            )
            .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DirectoryStore;
    use pagecraft_render::NodeTree;
    use pretty_assertions::assert_eq;

    fn fetcher() -> PageFetcher<DirectoryStore> {
        let store = DirectoryStore::new();
        store.insert(PageDocument {
            id: "p1".into(),
            slug: "welcome".into(),
            workspace_id: "w1".into(),
            name: "Welcome".into(),
            content: NodeTree::from_json(
                r#"{
                    "ROOT": { "type": "Element", "nodes": ["h"] },
                    "h": { "type": "Heading", "props": { "text": "Hello" } }
                }"#,
            )
            .unwrap(),
            ..Default::default()
        });
        PageFetcher::uncached(store)
    }

    async fn serve(request: PageRequest) -> PageResponse {
        serve_page(&fetcher(), None, &RenderOptions::default(), &request).await
    }

    #[tokio::test]
    async fn explicit_id_and_workspace() {
        let response = serve(PageRequest::by_id("p1", "w1")).await;
        assert_eq!(response.status(), 200);
        match response {
            PageResponse::Rendered { title, html } => {
                assert_eq!(title, "Welcome");
                assert!(html.contains("Hello"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn slug_uses_session_workspace() {
        let session = Session {
            auth_token: Some("tok".into()),
            tenant_id: Some("t1".into()),
            workspace_id: Some("w1".into()),
        };
        let response = serve(PageRequest::by_slug("welcome", session)).await;
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn request_workspace_wins_over_session() {
        let session = Session {
            workspace_id: Some("w1".into()),
            ..Default::default()
        };
        let mut request = PageRequest::by_slug("welcome", session);
        request.workspace_id = Some("w2".into());
        assert_eq!(serve(request).await, PageResponse::NotFound);
    }

    #[tokio::test]
    async fn missing_identity_is_not_found() {
        assert_eq!(serve(PageRequest::default()).await, PageResponse::NotFound);

        let no_session = PageRequest {
            slug: Some("welcome".into()),
            workspace_id: Some("w1".into()),
            ..Default::default()
        };
        assert_eq!(serve(no_session).await, PageResponse::NotFound);

        let no_workspace = PageRequest::by_slug("welcome", Session::default());
        assert_eq!(serve(no_workspace).await, PageResponse::NotFound);

        let blank_id = PageRequest::by_id("  ", "w1");
        assert_eq!(serve(blank_id).await, PageResponse::NotFound);
    }

    #[test]
    fn fetch_errors_map_to_responses() {
        assert_eq!(
            PageResponse::from(FetchError::Unauthorized("p".into())),
            PageResponse::NotFound
        );
        let unavailable = PageResponse::from(FetchError::Transient("timeout".into()));
        assert_eq!(unavailable.status(), 503);
        assert_eq!(
            PageResponse::from(FetchError::InvalidDocument("bad".into())).status(),
            503
        );
    }
}
