use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Key;

/// An insertion-ordered mapping node.
pub type Mapping = IndexMap<Key, Tree>;

/// A decoded content tree: scalars, sequences, and mappings.
///
/// `Tree` deserializes from any self-describing serde format, so a YAML or
/// JSON document can be decoded directly into it and handed to
/// [`untag`](crate::untag).
///
/// # Example
///
/// ```
/// use untag::Tree;
///
/// let tree: Tree = serde_json::from_str(r#"{"title@fr": "Bonjour", "tags": [1, 2]}"#).unwrap();
/// let mapping = tree.as_mapping().unwrap();
/// assert_eq!(mapping.len(), 2);
/// assert!(tree.get("tags").unwrap().is_sequence());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tree {
    /// An absent value.
    #[default]
    Null,

    /// A boolean scalar.
    Bool(bool),

    /// An integer scalar.
    Int(i64),

    /// A floating-point scalar.
    Float(f64),

    /// A string scalar.
    String(String),

    /// An ordered sequence of trees.
    Sequence(Vec<Tree>),

    /// A mapping from keys to trees.
    Mapping(Mapping),
}

impl Tree {
    /// Whether this node is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Tree::Sequence(_))
    }

    /// Get this node as a mapping, if it is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Tree::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a string-keyed field of a mapping node.
    ///
    /// Returns `None` for non-mapping nodes and missing fields.
    pub fn get(&self, field: &str) -> Option<&Tree> {
        self.as_mapping()
            .and_then(|map| map.get(&Key::name(field)))
    }
}

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Bool(b)
    }
}

impl From<i32> for Tree {
    fn from(n: i32) -> Self {
        Tree::Int(i64::from(n))
    }
}

impl From<i64> for Tree {
    fn from(n: i64) -> Self {
        Tree::Int(n)
    }
}

impl From<f64> for Tree {
    fn from(n: f64) -> Self {
        Tree::Float(n)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::String(s.to_string())
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::String(s)
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::Sequence(items)
    }
}

impl From<Mapping> for Tree {
    fn from(map: Mapping) -> Self {
        Tree::Mapping(map)
    }
}

impl<K: Into<Key>, V: Into<Tree>> FromIterator<(K, V)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tree::Mapping(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
