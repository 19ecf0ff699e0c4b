//! Per-render inputs besides the tree itself.

use crate::layout::DEFAULT_COLUMN_GAP;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default nesting limit before a subtree is replaced by a placeholder.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default number of nodes one render may expand. Shared subtrees count once
/// per reference.
pub const DEFAULT_MAX_NODES: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub max_depth: usize,
    pub max_nodes: usize,
    /// Gap between layout slots, in pixels.
    pub column_gap: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            column_gap: DEFAULT_COLUMN_GAP,
        }
    }
}

/// Everything a render reads apart from the tree. Holding the clock here
/// keeps a render a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    /// Collaborator data fetched before the render, keyed by node id.
    pub leaf_data: HashMap<String, LeafData>,
    pub options: RenderOptions,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context pinned to a fixed clock.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            leaf_data: HashMap::new(),
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_leaf_data(mut self, leaf_data: HashMap<String, LeafData>) -> Self {
        self.leaf_data = leaf_data;
        self
    }
}

/// Data a self-fetching leaf received from its collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafData {
    Comments(CommentThread),
    Birthdays(Vec<Birthday>),
    /// The fetch failed; the leaf falls back to sample content.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Total on the server; may exceed `comments.len()` when paginated.
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Birthday {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
