//! Decoded XML document tree and the singleton-collapsing `extract` step.
//!
//! The decoder follows the always-array model: every child element name
//! maps to a [`Node::List`] even when the element occurs once. [`extract`]
//! undoes that for scalar leaves so response fields read naturally.
//!
//! ```rust
//! use mns::xml::{extract, Node};
//!
//! let wrapped = Node::List(vec![Node::scalar("Q1")]);
//! assert_eq!(extract(wrapped), Node::scalar("Q1"));
//! ```

use std::collections::BTreeMap;

/// Key under which element attributes are stored.
pub const ATTRIBUTES_KEY: &str = "$";

/// Key under which text mixed with child elements is stored.
pub const TEXT_KEY: &str = "_";

/// Flat field mapping produced for a response entity.
pub type Fields = BTreeMap<String, Node>;

/// A node of a decoded XML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Text content of a leaf element.
    Scalar(String),
    /// All occurrences of one child element name, in document order.
    List(Vec<Node>),
    /// An element with children or attributes, keyed by child name.
    Object(BTreeMap<String, Node>),
}

impl Node {
    /// Creates a scalar node.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Returns the text of a scalar node.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the items of a list node.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of an object node.
    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key of an object node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|map| map.get(key))
    }
}

/// Collapses single-scalar lists, recursing through the whole tree.
///
/// - a one-element list holding a scalar becomes that scalar
/// - any other list stays a list of extracted items
/// - an object has each of its values extracted
/// - a scalar is returned unchanged
#[must_use]
pub fn extract(node: Node) -> Node {
    match node {
        Node::List(mut items) if items.len() == 1 && matches!(items[0], Node::Scalar(_)) => {
            items.remove(0)
        }
        Node::List(items) => Node::List(items.into_iter().map(extract).collect()),
        Node::Object(map) => Node::Object(
            map.into_iter()
                .map(|(key, value)| (key, extract(value)))
                .collect(),
        ),
        scalar @ Node::Scalar(_) => scalar,
    }
}

/// Returns the extracted fields of the root element named `entity`.
///
/// The attribute marker is skipped. If the document root has a different
/// name, or the root is a bare leaf, the result is empty.
#[must_use]
pub fn entity_fields(document: &Node, entity: &str) -> Fields {
    document
        .get(entity)
        .and_then(Node::as_object)
        .map(|root| {
            root.iter()
                .filter(|(key, _)| key.as_str() != ATTRIBUTES_KEY)
                .map(|(key, value)| (key.clone(), extract(value.clone())))
                .collect()
        })
        .unwrap_or_default()
}

impl From<Node> for serde_json::Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Scalar(value) => Self::String(value),
            Node::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Node::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object<const N: usize>(entries: [(&str, Node); N]) -> Node {
        Node::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    fn list<const N: usize>(items: [Node; N]) -> Node {
        Node::List(items.into())
    }

    #[test]
    fn test_extract_collapses_single_scalar() {
        assert_eq!(extract(list([Node::scalar("a")])), Node::scalar("a"));
    }

    #[test]
    fn test_extract_keeps_multi_element_lists() {
        let node = list([Node::scalar("a"), Node::scalar("b")]);
        assert_eq!(extract(node.clone()), node);
    }

    #[test]
    fn test_extract_keeps_empty_list() {
        assert_eq!(extract(Node::List(Vec::new())), Node::List(Vec::new()));
    }

    #[test]
    fn test_extract_single_object_stays_a_list() {
        let node = list([object([("QueueName", list([Node::scalar("Q1")]))])]);
        assert_eq!(
            extract(node),
            list([object([("QueueName", Node::scalar("Q1"))])])
        );
    }

    #[test]
    fn test_extract_recurses_into_objects() {
        let node = object([
            ("Code", list([Node::scalar("X")])),
            (
                ATTRIBUTES_KEY,
                object([("xmlns", Node::scalar("http://example"))]),
            ),
        ]);
        assert_eq!(
            extract(node),
            object([
                ("Code", Node::scalar("X")),
                (
                    ATTRIBUTES_KEY,
                    object([("xmlns", Node::scalar("http://example"))])
                ),
            ])
        );
    }

    #[test]
    fn test_extract_scalar_is_identity() {
        assert_eq!(extract(Node::scalar("x")), Node::scalar("x"));
    }

    #[test]
    fn test_extract_terminates_on_deep_nesting() {
        let mut node = list([Node::scalar("leaf")]);
        for depth in 0..64 {
            node = list([object([(&*format!("L{depth}"), node)])]);
        }

        let mut current = extract(node);
        for depth in (0..64).rev() {
            let items = current.as_list().expect("object lists are kept");
            assert_eq!(items.len(), 1);
            current = items[0].get(&format!("L{depth}")).unwrap().clone();
        }
        assert_eq!(current, Node::scalar("leaf"));
    }

    #[test]
    fn test_entity_fields_skips_attributes() {
        let document = object([(
            "Queue",
            object([
                (ATTRIBUTES_KEY, object([("xmlns", Node::scalar("ns"))])),
                ("QueueName", list([Node::scalar("Q1")])),
            ]),
        )]);
        let fields = entity_fields(&document, "Queue");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["QueueName"], Node::scalar("Q1"));
    }

    #[test]
    fn test_entity_fields_for_other_root_is_empty() {
        let document = object([("Topic", object([("TopicName", list([Node::scalar("t")]))]))]);
        assert!(entity_fields(&document, "Queue").is_empty());
    }

    #[test]
    fn test_node_into_json() {
        let node = object([
            ("Name", Node::scalar("n")),
            ("Items", list([Node::scalar("a"), Node::scalar("b")])),
        ]);
        let value: serde_json::Value = node.into();
        assert_eq!(value, serde_json::json!({"Name": "n", "Items": ["a", "b"]}));
    }
}
