//! Static checks over a node tree, without rendering it.

use crate::interpreter::parse_slot_index;
use crate::registry::{NodeKind, Registry};
use crate::tree::{NodeTree, ROOT_ID};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingRoot,
    MalformedRecord,
    /// A type the registry does not know; `None` when the node has no type.
    UnknownType(Option<String>),
    DanglingReference { target: String },
    MalformedSlotKey { key: String },
    /// Edge from the node back to one of its ancestors.
    Cycle { target: String },
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeIssue {
    pub severity: Severity,
    /// Node the issue was found on; `None` for document-level issues.
    pub node_id: Option<String>,
    pub kind: IssueKind,
}

impl TreeIssue {
    fn new(severity: Severity, node_id: Option<&str>, kind: IssueKind) -> Self {
        Self {
            severity,
            node_id: node_id.map(str::to_string),
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: ", level)?;
        if let Some(id) = &self.node_id {
            write!(f, "[{}] ", id)?;
        }
        match &self.kind {
            IssueKind::MissingRoot => write!(f, "document has no {} node", ROOT_ID),
            IssueKind::MalformedRecord => write!(f, "node record could not be decoded"),
            IssueKind::UnknownType(Some(name)) => write!(f, "unknown component type '{}'", name),
            IssueKind::UnknownType(None) => write!(f, "node has no type"),
            IssueKind::DanglingReference { target } => {
                write!(f, "references missing node '{}'", target)
            }
            IssueKind::MalformedSlotKey { key } => {
                write!(f, "linked key '{}' is not a slot key", key)
            }
            IssueKind::Cycle { target } => write!(f, "references its ancestor '{}'", target),
            IssueKind::Unreachable => write!(f, "not reachable from {}", ROOT_ID),
        }
    }
}

/// Inspects `tree`. Issues are ordered by node id, document-level first.
pub fn inspect(tree: &NodeTree) -> Vec<TreeIssue> {
    let mut issues = Vec::new();
    let registry = Registry::builtin();

    if tree.root().is_none() {
        issues.push(TreeIssue::new(Severity::Error, None, IssueKind::MissingRoot));
    }

    for (id, record) in tree.iter() {
        if record.malformed {
            issues.push(TreeIssue::new(Severity::Error, Some(id), IssueKind::MalformedRecord));
            continue;
        }
        if let NodeKind::Unregistered(name) = registry.classify(record.type_name()) {
            issues.push(TreeIssue::new(Severity::Warning, Some(id), IssueKind::UnknownType(name)));
        }
        for target in record.references() {
            if !tree.contains(target) {
                issues.push(TreeIssue::new(
                    Severity::Warning,
                    Some(id),
                    IssueKind::DanglingReference {
                        target: target.to_string(),
                    },
                ));
            }
        }
        for key in record.linked_nodes.keys() {
            if parse_slot_index(key).is_none() {
                issues.push(TreeIssue::new(
                    Severity::Warning,
                    Some(id),
                    IssueKind::MalformedSlotKey { key: key.clone() },
                ));
            }
        }
    }

    if tree.root().is_some() {
        let (reached, cycles) = walk_from_root(tree);
        for (from, to) in cycles {
            issues.push(TreeIssue::new(
                Severity::Error,
                Some(from),
                IssueKind::Cycle {
                    target: to.to_string(),
                },
            ));
        }
        for (id, _) in tree.iter() {
            if !reached.contains_key(id) {
                issues.push(TreeIssue::new(Severity::Warning, Some(id), IssueKind::Unreachable));
            }
        }
    }

    issues.sort_by(|a, b| a.node_id.cmp(&b.node_id));
    issues
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Open,
    Done,
}

/// Iterative depth-first walk from ROOT. Returns the visited ids and every
/// back edge, so arbitrarily deep documents cannot exhaust the stack.
fn walk_from_root(tree: &NodeTree) -> (HashMap<&str, Visit>, Vec<(&str, &str)>) {
    let mut visits: HashMap<&str, Visit> = HashMap::new();
    let mut back_edges = Vec::new();
    let Some(root) = tree.root() else {
        return (visits, back_edges);
    };
    visits.insert(ROOT_ID, Visit::Open);
    let mut stack: Vec<(&str, Vec<&str>, usize)> =
        vec![(ROOT_ID, root.references().collect(), 0)];

    while let Some(frame) = stack.last_mut() {
        let parent = frame.0;
        let Some(&child) = frame.1.get(frame.2) else {
            visits.insert(parent, Visit::Done);
            stack.pop();
            continue;
        };
        frame.2 += 1;
        let Some(record) = tree.get(child) else {
            continue;
        };
        match visits.get(child) {
            Some(Visit::Open) => back_edges.push((parent, child)),
            Some(Visit::Done) => {}
            None => {
                visits.insert(child, Visit::Open);
                stack.push((child, record.references().collect(), 0));
            }
        }
    }
    (visits, back_edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn kinds(issues: &[TreeIssue]) -> Vec<(Option<&str>, &IssueKind)> {
        issues.iter().map(|i| (i.node_id.as_deref(), &i.kind)).collect()
    }

    #[test]
    fn clean_tree_has_no_issues() {
        let tree = NodeTree::new()
            .with(ROOT_ID, NodeRecord::new("Element").with_nodes(&["a"]))
            .with("a", NodeRecord::new("Paragraph"));
        assert_eq!(inspect(&tree), Vec::new());
    }

    #[test]
    fn missing_root_is_an_error() {
        let issues = inspect(&NodeTree::new());
        assert_eq!(kinds(&issues), vec![(None, &IssueKind::MissingRoot)]);
        assert!(issues[0].is_error());
    }

    #[test]
    fn reports_reference_and_type_problems() {
        let tree = NodeTree::from_value(json!({
            "ROOT": {
                "type": "TwoEqualColumns",
                "linkedNodes": { "ROOT-column-0": "gone", "bogus": "w" }
            },
            "w": { "type": "Widget" },
            "orphan": { "type": "Paragraph" }
        }))
        .unwrap();
        let issues = inspect(&tree);
        assert_eq!(
            kinds(&issues),
            vec![
                (
                    Some("ROOT"),
                    &IssueKind::DanglingReference {
                        target: "gone".into()
                    }
                ),
                (
                    Some("ROOT"),
                    &IssueKind::MalformedSlotKey {
                        key: "bogus".into()
                    }
                ),
                (Some("orphan"), &IssueKind::Unreachable),
                (Some("w"), &IssueKind::UnknownType(Some("Widget".into()))),
            ]
        );
        assert!(issues.iter().all(|i| !i.is_error()));
    }

    #[test]
    fn detects_cycles() {
        let tree = NodeTree::new()
            .with(ROOT_ID, NodeRecord::new("Element").with_nodes(&["a"]))
            .with("a", NodeRecord::new("Section").with_nodes(&["b"]))
            .with("b", NodeRecord::new("Section").with_nodes(&["a"]));
        let issues = inspect(&tree);
        assert_eq!(
            kinds(&issues),
            vec![(Some("b"), &IssueKind::Cycle { target: "a".into() })]
        );
        assert_eq!(issues[0].to_string(), "error: [b] references its ancestor 'a'");
    }

    #[test]
    fn shared_child_is_not_a_cycle() {
        let tree = NodeTree::new()
            .with(ROOT_ID, NodeRecord::new("Element").with_nodes(&["a", "b"]))
            .with("a", NodeRecord::new("Section").with_nodes(&["c"]))
            .with("b", NodeRecord::new("Section").with_nodes(&["c"]))
            .with("c", NodeRecord::new("Paragraph"));
        assert_eq!(inspect(&tree), Vec::new());
    }
}
