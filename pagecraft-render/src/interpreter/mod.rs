//! Node tree interpreter.
//!
//! Walks a [`NodeTree`] depth-first from a node id and produces a
//! [`RenderNode`]. Problems inside the tree never fail the render: dangling
//! ids render nothing, and unknown types, malformed records, cycles,
//! excessive nesting and an exhausted node budget render a visible
//! placeholder in place of the subtree.

pub mod slots;

use crate::context::RenderContext;
use crate::layout::{render_layout, LayoutKind};
use crate::leaves::{render_leaf, LeafInput};
use crate::markup::{Element, RenderNode};
use crate::registry::{LeafKind, NodeKind, Registry};
use crate::style::merged_style;
use crate::tree::{NodeRecord, NodeTree, Props, ROOT_ID};
use serde_json::Value;
use std::cell::Cell;

pub use slots::{parse_slot_index, resolve_slots, ResolvedSlots, SlotKeyAlias, SlotSource};

/// Tags a generic container may ask for through `props.tag`.
const CONTAINER_TAGS: &[&str] = &["div", "section", "article", "header", "footer", "main", "aside"];

/// Props key holding per-instance layout widths.
const COLUMN_WIDTHS_PROP: &str = "columnWidths";

/// Renders `node_id` and its subtree. `None` when the id is not in the tree
/// or the node is hidden.
pub fn render(tree: &NodeTree, node_id: &str, ctx: &RenderContext) -> Option<RenderNode> {
    Interpreter::new(tree, ctx).render(node_id)
}

/// Renders from `ROOT`; a tree without `ROOT` renders nothing.
pub fn render_root(tree: &NodeTree, ctx: &RenderContext) -> Option<RenderNode> {
    render(tree, ROOT_ID, ctx)
}

/// One render of one tree. The tree is only borrowed, so a tree can be
/// rendered by any number of interpreters at once.
pub struct Interpreter<'a> {
    tree: &'a NodeTree,
    ctx: &'a RenderContext,
    registry: &'static Registry,
    /// Nodes expanded so far, checked against `max_nodes`.
    expanded: Cell<usize>,
}

impl<'a> Interpreter<'a> {
    pub fn new(tree: &'a NodeTree, ctx: &'a RenderContext) -> Self {
        Self {
            tree,
            ctx,
            registry: Registry::builtin(),
            expanded: Cell::new(0),
        }
    }

    pub fn render(&self, node_id: &str) -> Option<RenderNode> {
        self.expanded.set(0);
        let mut ancestors = Vec::new();
        self.render_node(node_id, &mut ancestors)
    }

    fn render_node(&self, node_id: &str, ancestors: &mut Vec<String>) -> Option<RenderNode> {
        let Some(record) = self.tree.get(node_id) else {
            tracing::debug!("dangling reference to {}", node_id);
            return None;
        };
        if ancestors.iter().any(|id| id == node_id) {
            tracing::warn!(
                "cyclic reference: {} is its own ancestor ({})",
                node_id,
                ancestors.join(" > ")
            );
            return Some(placeholder(
                "cycle",
                node_id,
                &format!("Cyclic reference: {}", node_id),
            ));
        }
        if ancestors.len() >= self.ctx.options.max_depth {
            tracing::warn!(
                "nesting deeper than {} at {}; subtree skipped",
                self.ctx.options.max_depth,
                node_id
            );
            return Some(placeholder("depth", node_id, "Nesting too deep"));
        }
        if record.malformed {
            return Some(placeholder(
                "malformed",
                node_id,
                &format!("Malformed node: {}", node_id),
            ));
        }
        if record.hidden {
            return None;
        }
        let expanded = self.expanded.get() + 1;
        if expanded > self.ctx.options.max_nodes {
            if expanded == self.ctx.options.max_nodes + 1 {
                tracing::warn!(
                    "node budget of {} exhausted at {}; remaining subtrees skipped",
                    self.ctx.options.max_nodes,
                    node_id
                );
            }
            self.expanded.set(expanded);
            return Some(placeholder("budget", node_id, "Too many nodes"));
        }
        self.expanded.set(expanded);

        ancestors.push(node_id.to_string());
        let rendered = match self.registry.classify(record.type_name()) {
            NodeKind::Container => self.render_container(node_id, record, ancestors),
            NodeKind::Layout(kind) => self.render_layout_node(node_id, record, kind, ancestors),
            NodeKind::Leaf(kind) => self.render_leaf_node(node_id, record, kind, ancestors),
            NodeKind::Unregistered(name) => {
                tracing::debug!("node {} has unregistered type {:?}", node_id, name);
                let message = match name {
                    Some(name) => format!("Unknown component: {}", name),
                    None => "Unknown".to_string(),
                };
                placeholder("unknown", node_id, &message)
            }
        };
        ancestors.pop();
        Some(rendered)
    }

    /// Children from `nodes`, in order; dangling ids are skipped.
    fn render_children(&self, record: &NodeRecord, ancestors: &mut Vec<String>) -> Vec<RenderNode> {
        record
            .nodes
            .iter()
            .filter_map(|child| self.render_node(child, ancestors))
            .collect()
    }

    fn render_container(
        &self,
        node_id: &str,
        record: &NodeRecord,
        ancestors: &mut Vec<String>,
    ) -> RenderNode {
        let tag = record
            .prop_str("tag")
            .filter(|tag| CONTAINER_TAGS.contains(tag))
            .unwrap_or("div");
        let children = self.render_children(record, ancestors);
        let element = Element::new(tag).class("pc-element").children(children);
        decorate(element, node_id, &record.props).into()
    }

    fn render_layout_node(
        &self,
        node_id: &str,
        record: &NodeRecord,
        kind: LayoutKind,
        ancestors: &mut Vec<String>,
    ) -> RenderNode {
        let resolved = resolve_slots(self.tree, node_id, record, kind);
        tracing::debug!(
            "{} {} resolved from {:?}: {:?}",
            kind.name(),
            node_id,
            resolved.source,
            resolved.node_ids
        );
        let contents: Vec<Option<RenderNode>> = resolved
            .node_ids
            .iter()
            .map(|slot| {
                slot.as_deref()
                    .and_then(|child| self.render_node(child, ancestors))
            })
            .collect();
        let widths = kind.widths(record.props.get(COLUMN_WIDTHS_PROP));
        let gap = record
            .props
            .get("gap")
            .and_then(Value::as_f64)
            .filter(|gap| gap.is_finite() && *gap >= 0.0)
            .unwrap_or(self.ctx.options.column_gap);
        let element = render_layout(kind, contents, &widths, gap);
        decorate(element, node_id, &record.props).into()
    }

    fn render_leaf_node(
        &self,
        node_id: &str,
        record: &NodeRecord,
        kind: LeafKind,
        ancestors: &mut Vec<String>,
    ) -> RenderNode {
        let children = self.render_children(record, ancestors);
        let input = LeafInput {
            node_id,
            props: &record.props,
            children,
            ctx: self.ctx,
        };
        decorate(render_leaf(kind, input), node_id, &record.props).into()
    }
}

/// Applies what every node carries regardless of type: the node id, the
/// author's class name and element id, and the merged style.
fn decorate(mut element: Element, node_id: &str, props: &Props) -> Element {
    element.set_attr("data-node-id", node_id);
    if let Some(class_name) = props.get("className").and_then(Value::as_str) {
        for class in class_name.split_whitespace() {
            element.add_class(class);
        }
    }
    if let Some(id) = props.get("id").and_then(Value::as_str).filter(|id| !id.is_empty()) {
        element.set_attr("id", id);
    }
    element.with_style(&merged_style(props))
}

fn placeholder(modifier: &str, node_id: &str, message: &str) -> RenderNode {
    Element::new("div")
        .class("pc-placeholder")
        .class(&format!("pc-placeholder--{}", modifier))
        .attr("data-node-id", node_id)
        .text(message)
        .into()
}
