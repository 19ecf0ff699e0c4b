use chrono::{DateTime, Utc};
use pagecraft_render::{
    render_page_html, render_root, Element, NodeTree, RenderContext, RenderError, RenderNode,
    RenderResult,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored page: identity plus the node tree the renderer walks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub workspace_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: NodeTree,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageDocument {
    /// Display title: the page name, else the slug, else the id.
    pub fn title(&self) -> &str {
        [&self.name, &self.slug, &self.id]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("Untitled page")
    }

    /// Decodes either a full page document or a bare node tree. A bare tree
    /// is wrapped in a document named `fallback_name`.
    pub fn from_json_or_tree(json: &str, fallback_name: &str) -> RenderResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        if is_page_document(&value) {
            return serde_json::from_value(value).map_err(RenderError::from);
        }
        Ok(PageDocument {
            name: fallback_name.to_string(),
            content: NodeTree::from_value(value)?,
            ..Default::default()
        })
    }

    /// Rendered content, or an empty marker when the tree has no `ROOT`.
    pub fn render_body(&self, ctx: &RenderContext) -> RenderNode {
        render_root(&self.content, ctx)
            .unwrap_or_else(|| Element::new("div").class("pc-page-empty").into())
    }

    /// Complete HTML document for this page.
    pub fn render_html(&self, ctx: &RenderContext) -> String {
        render_page_html(self.title(), &self.render_body(ctx))
    }
}

fn is_page_document(value: &Value) -> bool {
    value
        .as_object()
        .map(|map| map.contains_key("content") && map.contains_key("workspaceId"))
        .unwrap_or(false)
}
