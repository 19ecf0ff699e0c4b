//! Layout resolution: which node fills each slot of a layout container.

use crate::layout::LayoutKind;
use crate::tree::{NodeRecord, NodeTree};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// A spelling of the slot key `<containerId><sep>column<sep><index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKeyAlias {
    /// `ROOT-column-0`, written by current editor versions.
    Hyphen,
    /// `ROOT_column_0`. Drop once stored documents are migrated.
    Underscore,
}

/// Aliases tried for each slot, in order.
pub const SLOT_KEY_ALIASES: &[SlotKeyAlias] = &[SlotKeyAlias::Hyphen, SlotKeyAlias::Underscore];

impl SlotKeyAlias {
    pub fn key(self, container_id: &str, index: usize) -> String {
        match self {
            SlotKeyAlias::Hyphen => format!("{}-column-{}", container_id, index),
            SlotKeyAlias::Underscore => format!("{}_column_{}", container_id, index),
        }
    }
}

static SLOT_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

/// Trailing slot index of a linked-node key, `None` when the key does not
/// follow the slot pattern.
pub fn parse_slot_index(key: &str) -> Option<usize> {
    let slot_key_regex =
        SLOT_KEY_REGEX.get_or_init(|| Regex::new(r"(?:-|_)column(?:-|_)(\d+)$").unwrap());
    slot_key_regex
        .captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Where the slot contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource {
    LinkedNodes,
    ColumnScan,
    /// Nothing usable; every slot is empty.
    Empty,
}

/// Node id per slot, always exactly the layout's slot count long.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlots {
    pub node_ids: Vec<Option<String>>,
    pub source: SlotSource,
}

/// Resolves the slots of layout container `container_id`.
///
/// Linked nodes are matched by key, trying each alias per slot index;
/// entries left over (foreign container ids, unparseable keys) fill the
/// remaining empty slots ordered by parsed index, unparseable keys counting
/// as index 0. Without linked nodes the column-like children in `nodes`
/// become the slots.
pub fn resolve_slots(
    tree: &NodeTree,
    container_id: &str,
    record: &NodeRecord,
    kind: LayoutKind,
) -> ResolvedSlots {
    let count = kind.slot_count();
    if !record.linked_nodes.is_empty() {
        return ResolvedSlots {
            node_ids: from_linked(container_id, record, count),
            source: SlotSource::LinkedNodes,
        };
    }

    let mut node_ids: Vec<Option<String>> = record
        .nodes
        .iter()
        .filter(|id| tree.get(id).is_some_and(NodeRecord::is_column_like))
        .take(count)
        .map(|id| Some(id.clone()))
        .collect();
    let source = if node_ids.is_empty() {
        SlotSource::Empty
    } else {
        SlotSource::ColumnScan
    };
    if record.nodes.len() > node_ids.len() {
        tracing::debug!(
            "{} {} has {} children; {} used as columns",
            kind.name(),
            container_id,
            record.nodes.len(),
            node_ids.len()
        );
    }
    node_ids.resize(count, None);
    ResolvedSlots { node_ids, source }
}

fn from_linked(container_id: &str, record: &NodeRecord, count: usize) -> Vec<Option<String>> {
    let mut slots: Vec<Option<String>> = vec![None; count];
    let mut used: HashSet<&str> = HashSet::new();

    for (index, slot) in slots.iter_mut().enumerate() {
        for alias in SLOT_KEY_ALIASES {
            let key = alias.key(container_id, index);
            if let Some((stored_key, target)) = record.linked_nodes.get_key_value(&key) {
                *slot = Some(target.clone());
                used.insert(stored_key.as_str());
                break;
            }
        }
    }

    let mut leftovers: Vec<(usize, &str, &str)> = record
        .linked_nodes
        .iter()
        .filter(|(key, _)| !used.contains(key.as_str()))
        .map(|(key, target)| {
            let index = parse_slot_index(key).unwrap_or_else(|| {
                tracing::debug!("linked key {} on {} is not a slot key", key, container_id);
                0
            });
            (index, key.as_str(), target.as_str())
        })
        .collect();
    leftovers.sort();

    let mut leftovers = leftovers.into_iter();
    for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
        match leftovers.next() {
            Some((_, _, target)) => *slot = Some(target.to_string()),
            None => break,
        }
    }
    for (_, key, _) in leftovers {
        tracing::debug!("linked key {} on {} has no free slot", key, container_id);
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ids(slots: &ResolvedSlots) -> Vec<Option<&str>> {
        slots.node_ids.iter().map(|id| id.as_deref()).collect()
    }

    #[test]
    fn parses_slot_indices() {
        assert_eq!(parse_slot_index("ROOT-column-2"), Some(2));
        assert_eq!(parse_slot_index("abc_column_10"), Some(10));
        assert_eq!(parse_slot_index("ROOT-column-x"), None);
        assert_eq!(parse_slot_index("whatever"), None);
    }

    #[test]
    fn linked_nodes_fill_slots_by_index() {
        let record = NodeRecord::new("ThreeEqualColumns")
            .with_linked("L-column-2", "c")
            .with_linked("L-column-0", "a");
        let tree = NodeTree::new().with("L", record.clone());
        let slots = resolve_slots(&tree, "L", &record, LayoutKind::ThreeEqualColumns);
        assert_eq!(slots.source, SlotSource::LinkedNodes);
        assert_eq!(ids(&slots), vec![Some("a"), None, Some("c")]);
    }

    #[test]
    fn underscore_alias_is_accepted() {
        let record = NodeRecord::new("TwoEqualColumns")
            .with_linked("L_column_1", "b")
            .with_linked("L-column-0", "a");
        let tree = NodeTree::new();
        let slots = resolve_slots(&tree, "L", &record, LayoutKind::TwoEqualColumns);
        assert_eq!(ids(&slots), vec![Some("a"), Some("b")]);
    }

    #[test]
    fn foreign_and_malformed_keys_fill_free_slots_in_order() {
        // Copied containers keep the old container id in their keys.
        let record = NodeRecord::new("ThreeEqualColumns")
            .with_linked("old-column-1", "b")
            .with_linked("garbage", "z")
            .with_linked("old-column-0", "a");
        let tree = NodeTree::new();
        let slots = resolve_slots(&tree, "new", &record, LayoutKind::ThreeEqualColumns);
        // index 0 ties break on the key: "garbage" < "old-column-0"
        assert_eq!(ids(&slots), vec![Some("z"), Some("a"), Some("b")]);
    }

    #[test]
    fn extra_linked_entries_never_add_slots() {
        let mut record = NodeRecord::new("TwoEqualColumns");
        for i in 0..5 {
            record = record.with_linked(&format!("L-column-{}", i), &format!("n{}", i));
        }
        let slots = resolve_slots(&NodeTree::new(), "L", &record, LayoutKind::TwoEqualColumns);
        assert_eq!(ids(&slots), vec![Some("n0"), Some("n1")]);
    }

    #[test]
    fn falls_back_to_column_children() {
        let record = NodeRecord::new("SidebarMainLayout").with_nodes(&["p", "c1", "c2", "c3"]);
        let mut marked = NodeRecord::new("Element");
        marked.custom.insert("layoutType".into(), json!("column"));
        let tree = NodeTree::new()
            .with("p", NodeRecord::new("Paragraph"))
            .with("c1", NodeRecord::new("Column"))
            .with("c2", marked)
            .with("c3", NodeRecord::new("Column"));
        let slots = resolve_slots(&tree, "L", &record, LayoutKind::SidebarMainLayout);
        assert_eq!(slots.source, SlotSource::ColumnScan);
        assert_eq!(ids(&slots), vec![Some("c1"), Some("c2")]);
    }

    #[test]
    fn no_columns_means_all_empty() {
        let record = NodeRecord::new("FourEqualColumns").with_nodes(&["p"]);
        let tree = NodeTree::new().with("p", NodeRecord::new("Paragraph"));
        let slots = resolve_slots(&tree, "L", &record, LayoutKind::FourEqualColumns);
        assert_eq!(slots.source, SlotSource::Empty);
        assert_eq!(slots.node_ids, vec![None; 4]);
    }
}
