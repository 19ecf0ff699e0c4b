//! Node tree data model.
//!
//! A content document is a flat map of node id to [`NodeRecord`]; `ROOT` is
//! the entry point. Records come from the authoring tool and are loosely
//! typed, so decoding is lenient: a record that does not decode is kept as a
//! malformed placeholder instead of failing the whole document.

use crate::error::{RenderError, RenderResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Id of the node every render starts from.
pub const ROOT_ID: &str = "ROOT";

/// Open key-value bag of presentation configuration.
pub type Props = Map<String, Value>;

/// Display names older editor versions gave to column containers.
const LEGACY_COLUMN_DISPLAY_NAMES: &[&str] = &["Column", "Coluna", "Layout Column"];

/// Type reference: a bare name or the resolver's wrapped `{ resolvedName }` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Resolved {
        #[serde(rename = "resolvedName", default)]
        resolved_name: Option<String>,
    },
}

impl TypeRef {
    /// Effective type name; both forms resolve the same way.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Name(name) => Some(name.as_str()),
            TypeRef::Resolved { resolved_name } => resolved_name.as_deref(),
        }
    }
}

/// One node of the content document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeRecord {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    #[serde(deserialize_with = "nullable")]
    pub props: Props,
    /// Ordered child ids.
    #[serde(deserialize_with = "nullable")]
    pub nodes: Vec<String>,
    /// Slot key to node id, used by layout containers.
    #[serde(deserialize_with = "nullable")]
    pub linked_nodes: BTreeMap<String, String>,
    #[serde(deserialize_with = "nullable")]
    pub custom: Props,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub hidden: bool,
    /// Set when the raw record could not be decoded.
    #[serde(skip)]
    pub malformed: bool,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl NodeRecord {
    /// Builds a record with a bare type name.
    pub fn new(type_name: &str) -> Self {
        Self {
            type_ref: Some(TypeRef::Name(type_name.to_string())),
            ..Self::default()
        }
    }

    fn malformed() -> Self {
        Self {
            malformed: true,
            ..Self::default()
        }
    }

    pub fn with_props(mut self, props: Value) -> Self {
        if let Value::Object(map) = props {
            self.props = map;
        }
        self
    }

    pub fn with_nodes(mut self, nodes: &[&str]) -> Self {
        self.nodes = nodes.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_linked(mut self, key: &str, node_id: &str) -> Self {
        self.linked_nodes.insert(key.to_string(), node_id.to_string());
        self
    }

    /// Effective type name, `type.resolvedName ?? type`. Empty names count as absent.
    pub fn type_name(&self) -> Option<&str> {
        self.type_ref
            .as_ref()
            .and_then(TypeRef::name)
            .filter(|name| !name.is_empty())
    }

    /// Every id this record points at: `nodes` first, then linked slot targets.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .map(String::as_str)
            .chain(self.linked_nodes.values().map(String::as_str))
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Whether the fallback slot scan should treat this node as a column.
    pub fn is_column_like(&self) -> bool {
        if self.type_name() == Some("Column") {
            return true;
        }
        let marked = self
            .custom
            .get("layoutType")
            .and_then(Value::as_str)
            .is_some_and(|t| t == "column");
        if marked {
            return true;
        }
        self.display_name
            .as_deref()
            .is_some_and(|name| LEGACY_COLUMN_DISPLAY_NAMES.contains(&name))
    }
}

/// Immutable snapshot of a content document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTree {
    nodes: HashMap<String, NodeRecord>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a tree from its JSON text.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decodes a tree from an object, a JSON-encoded string holding that
    /// object, or `null` (an empty document).
    pub fn from_value(value: Value) -> RenderResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::String(encoded) => match serde_json::from_str::<Value>(&encoded)? {
                Value::Object(map) => Ok(Self::from_map(map)),
                other => Err(RenderError::InvalidEncodedContent(json_kind(&other).to_string())),
            },
            Value::Null => Ok(Self::new()),
            other => Err(RenderError::InvalidTreeShape {
                found: json_kind(&other).to_string(),
            }),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let nodes = map
            .into_iter()
            .map(|(id, raw)| {
                let record = serde_json::from_value::<NodeRecord>(raw).unwrap_or_else(|err| {
                    tracing::debug!("node {} is malformed: {}", id, err);
                    NodeRecord::malformed()
                });
                (id, record)
            })
            .collect();
        Self { nodes }
    }

    pub fn insert(&mut self, id: &str, record: NodeRecord) {
        self.nodes.insert(id.to_string(), record);
    }

    /// Builder-style [`NodeTree::insert`].
    pub fn with(mut self, id: &str, record: NodeRecord) -> Self {
        self.insert(id, record);
        self
    }

    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<&NodeRecord> {
        self.get(ROOT_ID)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids reachable from `start` without passing through a hidden or
    /// malformed record, in depth-first order. Each id appears once.
    pub fn visible_from(&self, start: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some((id, record)) = self.nodes.get_key_value(id) else {
                continue;
            };
            if record.hidden || record.malformed || !seen.insert(id.as_str()) {
                continue;
            }
            order.push(id.as_str());
            let children: Vec<&str> = record.references().collect();
            stack.extend(children.into_iter().rev());
        }
        order
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRecord)> {
        let mut entries: Vec<_> = self.nodes.iter().map(|(id, r)| (id.as_str(), r)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<'de> Deserialize<'de> for NodeTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        NodeTree::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for NodeTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ordered: BTreeMap<&String, &NodeRecord> = self.nodes.iter().collect();
        ordered.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_and_wrapped_type_names_match() {
        let tree = NodeTree::from_value(json!({
            "a": { "type": "Column" },
            "b": { "type": { "resolvedName": "Column" } },
        }))
        .unwrap();
        assert_eq!(tree.get("a").unwrap().type_name(), Some("Column"));
        assert_eq!(tree.get("b").unwrap().type_name(), Some("Column"));
    }

    #[test]
    fn wrapped_type_without_resolved_name_has_no_type() {
        let tree = NodeTree::from_value(json!({ "a": { "type": {} } })).unwrap();
        assert_eq!(tree.get("a").unwrap().type_name(), None);
        assert!(!tree.get("a").unwrap().malformed);
    }

    #[test]
    fn visible_from_skips_hidden_subtrees_and_orphans() {
        let tree = NodeTree::from_value(json!({
            "ROOT": { "type": "Element", "nodes": ["a", "hidden", "a", "missing"] },
            "a": { "type": "TwoEqualColumns", "linkedNodes": { "column-0": "b" } },
            "b": { "type": "Column", "nodes": ["ROOT"] },
            "hidden": { "type": "Element", "hidden": true, "nodes": ["under-hidden"] },
            "under-hidden": { "type": "Paragraph" },
            "orphan": { "type": "Paragraph" }
        }))
        .unwrap();
        assert_eq!(tree.visible_from(ROOT_ID), vec!["ROOT", "a", "b"]);
        assert!(tree.visible_from("nope").is_empty());
    }

    #[test]
    fn decodes_string_encoded_content() {
        let encoded = json!(r#"{"ROOT":{"type":"Element","nodes":["x"]},"x":{"type":"Paragraph"}}"#);
        let tree = NodeTree::from_value(encoded).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().unwrap().nodes, vec!["x".to_string()]);
    }

    #[test]
    fn malformed_record_does_not_fail_tree() {
        let tree = NodeTree::from_value(json!({
            "ROOT": { "type": "Element", "nodes": ["bad"] },
            "bad": { "type": "Paragraph", "nodes": "not-a-list" },
        }))
        .unwrap();
        assert!(tree.get("bad").unwrap().malformed);
        assert!(!tree.root().unwrap().malformed);
    }

    #[test]
    fn null_fields_default() {
        let tree = NodeTree::from_value(json!({
            "ROOT": { "type": "Element", "props": null, "nodes": null, "linkedNodes": null },
        }))
        .unwrap();
        let root = tree.root().unwrap();
        assert!(root.props.is_empty());
        assert!(root.nodes.is_empty());
        assert!(!root.malformed);
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(
            NodeTree::from_value(json!([1, 2])),
            Err(RenderError::InvalidTreeShape { .. })
        ));
        assert!(matches!(
            NodeTree::from_value(json!("[1]")),
            Err(RenderError::InvalidEncodedContent(_))
        ));
        assert!(NodeTree::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn column_markers() {
        let mut custom = NodeRecord::new("Container");
        custom.custom.insert("layoutType".into(), json!("column"));
        let mut legacy = NodeRecord::new("Container");
        legacy.display_name = Some("Coluna".into());

        assert!(NodeRecord::new("Column").is_column_like());
        assert!(custom.is_column_like());
        assert!(legacy.is_column_like());
        assert!(!NodeRecord::new("Paragraph").is_column_like());
    }
}
