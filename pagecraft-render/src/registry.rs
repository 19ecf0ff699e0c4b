//! Component registry: symbolic type names to the closed set of leaf kinds.

use crate::layout::LayoutKind;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Type names rendered as the generic styled wrapper.
pub const CONTAINER_MARKERS: &[&str] = &["Element", "div"];

/// Every leaf component the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Paragraph,
    Heading,
    RichText,
    Quote,
    Image,
    Video,
    Banner,
    Gallery,
    Carousel,
    NewsCarousel,
    Table,
    KanbanBoard,
    Stats,
    ProgressBar,
    Timeline,
    Button,
    Divider,
    Spacer,
    Countdown,
    Accordion,
    Alert,
    LinkList,
    ProfileCard,
    Column,
    Section,
    CommentsSection,
    BirthdayList,
}

/// Name table, canonical names first, then aliases used by older documents.
const REGISTRY: &[(&str, LeafKind)] = &[
    ("Paragraph", LeafKind::Paragraph),
    ("Heading", LeafKind::Heading),
    ("RichText", LeafKind::RichText),
    ("Quote", LeafKind::Quote),
    ("Image", LeafKind::Image),
    ("Video", LeafKind::Video),
    ("Banner", LeafKind::Banner),
    ("Gallery", LeafKind::Gallery),
    ("Carousel", LeafKind::Carousel),
    ("NewsCarousel", LeafKind::NewsCarousel),
    ("Table", LeafKind::Table),
    ("KanbanBoard", LeafKind::KanbanBoard),
    ("Stats", LeafKind::Stats),
    ("ProgressBar", LeafKind::ProgressBar),
    ("Timeline", LeafKind::Timeline),
    ("Button", LeafKind::Button),
    ("Divider", LeafKind::Divider),
    ("Spacer", LeafKind::Spacer),
    ("Countdown", LeafKind::Countdown),
    ("Accordion", LeafKind::Accordion),
    ("Alert", LeafKind::Alert),
    ("LinkList", LeafKind::LinkList),
    ("ProfileCard", LeafKind::ProfileCard),
    ("Column", LeafKind::Column),
    ("Section", LeafKind::Section),
    ("CommentsSection", LeafKind::CommentsSection),
    ("BirthdayList", LeafKind::BirthdayList),
    // aliases
    ("Text", LeafKind::Paragraph),
    ("Title", LeafKind::Heading),
    ("Markdown", LeafKind::RichText),
    ("Container", LeafKind::Section),
    ("ImageCarousel", LeafKind::Carousel),
    ("Kanban", LeafKind::KanbanBoard),
];

impl LeafKind {
    /// Canonical type name.
    pub fn name(self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("Unknown")
    }

    /// Kinds that place interpreter-rendered children inside themselves.
    pub fn accepts_children(self) -> bool {
        matches!(self, LeafKind::Column | LeafKind::Section | LeafKind::Banner)
    }

    /// Kinds whose data comes from a network collaborator.
    pub fn is_self_fetching(self) -> bool {
        matches!(self, LeafKind::CommentsSection | LeafKind::BirthdayList)
    }
}

/// How a node is handled, decided from its effective type name.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container,
    Layout(LayoutKind),
    Leaf(LeafKind),
    /// Not a container, layout or registered leaf. Carries the literal
    /// name, `None` when the node had no type at all.
    Unregistered(Option<String>),
}

/// Immutable lookup table.
#[derive(Debug)]
pub struct Registry {
    by_name: HashMap<&'static str, LeafKind>,
}

static BUILTIN: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// The process-wide registry.
    pub fn builtin() -> &'static Registry {
        BUILTIN.get_or_init(|| Registry {
            by_name: REGISTRY.iter().copied().collect(),
        })
    }

    pub fn resolve(&self, type_name: &str) -> Option<LeafKind> {
        self.by_name.get(type_name).copied()
    }

    pub fn classify(&self, type_name: Option<&str>) -> NodeKind {
        let Some(name) = type_name else {
            return NodeKind::Unregistered(None);
        };
        if CONTAINER_MARKERS.contains(&name) {
            return NodeKind::Container;
        }
        if let Some(layout) = LayoutKind::from_name(name) {
            return NodeKind::Layout(layout);
        }
        match self.resolve(name) {
            Some(kind) => NodeKind::Leaf(kind),
            None => NodeKind::Unregistered(Some(name.to_string())),
        }
    }

    /// Registered names, aliases included.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_names_and_aliases() {
        let registry = Registry::builtin();
        assert_eq!(registry.resolve("KanbanBoard"), Some(LeafKind::KanbanBoard));
        assert_eq!(registry.resolve("Text"), Some(LeafKind::Paragraph));
        assert_eq!(registry.resolve("UnknownWidget"), None);
    }

    #[test]
    fn canonical_name_round_trips() {
        let registry = Registry::builtin();
        for (_, kind) in REGISTRY {
            assert_eq!(registry.resolve(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn classify_orders_container_layout_leaf() {
        let registry = Registry::builtin();
        assert_eq!(registry.classify(Some("Element")), NodeKind::Container);
        assert_eq!(registry.classify(Some("div")), NodeKind::Container);
        assert_eq!(
            registry.classify(Some("TwoEqualColumns")),
            NodeKind::Layout(LayoutKind::TwoEqualColumns)
        );
        assert_eq!(registry.classify(Some("Banner")), NodeKind::Leaf(LeafKind::Banner));
        assert_eq!(
            registry.classify(Some("Mystery")),
            NodeKind::Unregistered(Some("Mystery".into()))
        );
        assert_eq!(registry.classify(None), NodeKind::Unregistered(None));
    }
}
