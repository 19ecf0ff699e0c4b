//! Comments, likes and birthdays service used by the two self-fetching
//! leaves, plus the pre-render fetch step that feeds them.

use crate::error::{ConfigError, SocialError, SocialResult};
use crate::page::PageDocument;
use async_trait::async_trait;
use futures::future::join_all;
use pagecraft_render::{
    Birthday, Comment, CommentThread, LeafData, LeafKind, NodeKind, Registry, ROOT_ID,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[async_trait]
pub trait LeafDataSource: Send + Sync {
    async fn comments(&self, page_id: &str, node_id: &str) -> SocialResult<CommentThread>;

    async fn birthdays(&self, workspace_id: &str) -> SocialResult<Vec<Birthday>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub page_id: String,
    pub node_id: String,
    pub author: String,
    pub body: String,
}

#[derive(Deserialize)]
struct LikeCount {
    likes: u32,
}

pub struct SocialClient {
    client: reqwest::Client,
    base_url: Url,
}

impl SocialClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::Invalid(format!("social.base_url {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "social.base_url {} cannot hold a path",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> SocialResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SocialError::Status(status.as_u16()));
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn post_comment(&self, comment: &NewComment) -> SocialResult<Comment> {
        let url = self.endpoint(&["comments"], &[]);
        Self::read_json(self.client.post(url).json(comment)).await
    }

    /// Toggles the caller's like and returns the new count.
    pub async fn toggle_like(&self, comment_id: &str) -> SocialResult<u32> {
        let url = self.endpoint(&["comments", comment_id, "like"], &[]);
        let count: LikeCount = Self::read_json(self.client.post(url)).await?;
        Ok(count.likes)
    }
}

#[async_trait]
impl LeafDataSource for SocialClient {
    async fn comments(&self, page_id: &str, node_id: &str) -> SocialResult<CommentThread> {
        let url = self.endpoint(&["comments"], &[("pageId", page_id), ("nodeId", node_id)]);
        Self::read_json(self.client.get(url)).await
    }

    async fn birthdays(&self, workspace_id: &str) -> SocialResult<Vec<Birthday>> {
        let url = self.endpoint(&["birthdays"], &[("workspaceId", workspace_id)]);
        Self::read_json(self.client.get(url)).await
    }
}

/// Fetches data for every comments and birthday node the render will reach,
/// concurrently. Birthdays are fetched once per page and shared by every
/// birthday node. A failed fetch yields [`LeafData::Unavailable`] so the leaf
/// falls back to sample content.
pub async fn prefetch_leaf_data(
    source: &dyn LeafDataSource,
    page: &PageDocument,
) -> HashMap<String, LeafData> {
    let registry = Registry::builtin();
    let mut comment_nodes = Vec::new();
    let mut birthday_nodes = Vec::new();
    for id in page.content.visible_from(ROOT_ID) {
        let Some(record) = page.content.get(id) else {
            continue;
        };
        match registry.classify(record.type_name()) {
            NodeKind::Leaf(LeafKind::BirthdayList) => birthday_nodes.push(id),
            NodeKind::Leaf(kind) if kind.is_self_fetching() => comment_nodes.push(id),
            _ => {}
        }
    }

    let comments = join_all(
        comment_nodes
            .iter()
            .map(|node_id| fetch_comments(source, page, node_id)),
    );
    let birthdays = async {
        if birthday_nodes.is_empty() {
            None
        } else {
            Some(fetch_birthdays(source, page).await)
        }
    };
    let (comments, birthdays) = futures::join!(comments, birthdays);

    let mut data: HashMap<String, LeafData> = comments.into_iter().collect();
    if let Some(birthdays) = birthdays {
        for node_id in birthday_nodes {
            data.insert(node_id.to_string(), birthdays.clone());
        }
    }
    data
}

async fn fetch_comments(
    source: &dyn LeafDataSource,
    page: &PageDocument,
    node_id: &str,
) -> (String, LeafData) {
    let data = match source.comments(&page.id, node_id).await {
        Ok(thread) => LeafData::Comments(thread),
        Err(err) => {
            tracing::warn!("comments for node {} unavailable: {}", node_id, err);
            LeafData::Unavailable(err.to_string())
        }
    };
    (node_id.to_string(), data)
}

async fn fetch_birthdays(source: &dyn LeafDataSource, page: &PageDocument) -> LeafData {
    match source.birthdays(&page.workspace_id).await {
        Ok(list) => LeafData::Birthdays(list),
        Err(err) => {
            tracing::warn!("birthdays for {} unavailable: {}", page.workspace_id, err);
            LeafData::Unavailable(err.to_string())
        }
    }
}
