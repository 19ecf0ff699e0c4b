//! # pagecraft-render
//!
//! Read-only renderer for page-builder documents. A document is a flat map
//! of node ids to loosely typed records; the renderer walks it from `ROOT`
//! and produces an HTML element tree.
//!
//! ## Features
//! - Lenient decoding: string-encoded content, null fields and malformed records
//! - Multi-column layouts addressed through `linkedNodes`, with legacy key spellings
//! - 27 leaf components, each with a fully defaulted config
//! - Margin/border/shadow style derivation
//! - Tree inspection without rendering
//!
//! ## Example
//! ```ignore
//! use pagecraft_render::{render_root, NodeTree, RenderContext};
//!
//! let tree = NodeTree::from_json(r#"{
//!   "ROOT": { "type": "Element", "nodes": ["a"] },
//!   "a": { "type": "Paragraph", "props": { "text": "hi" } }
//! }"#)?;
//! let html = render_root(&tree, &RenderContext::new())
//!     .map(|node| node.to_html())
//!     .unwrap_or_default();
//! ```

pub mod context;
pub mod error;
pub mod inspect;
pub mod interpreter;
pub mod layout;
pub mod leaves;
pub mod markup;
pub mod page;
pub mod registry;
pub mod sanitize;
pub mod style;
pub mod tree;

// --- Core types ---
pub use context::{Birthday, Comment, CommentThread, LeafData, RenderContext, RenderOptions};
pub use error::{RenderError, RenderResult};
pub use markup::{Element, RenderNode};
pub use tree::{NodeRecord, NodeTree, Props, TypeRef, ROOT_ID};

// --- Dispatch ---
pub use layout::LayoutKind;
pub use registry::{LeafKind, NodeKind, Registry};

pub use inspect::{inspect, IssueKind, Severity, TreeIssue};
pub use interpreter::{render, render_root, Interpreter};
pub use page::render_page_html;
pub use style::{derive_layout_style, StyleAttributes};

/// Renders a tree from `ROOT` to an HTML fragment; empty when there is no
/// `ROOT`.
pub fn render_fragment(tree: &NodeTree, ctx: &RenderContext) -> String {
    render_root(tree, ctx)
        .map(|node| node.to_html())
        .unwrap_or_default()
}
