use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// A key addressing a child of a [`Tree`](super::Tree) node.
///
/// Only [`Key::Name`] keys carry tags. Sequence positions and integer
/// mapping keys are [`Key::Index`] and always pass through untagging
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// A string key, e.g. `title@fr`.
    Name(String),

    /// A sequence position or an integer mapping key.
    Index(i64),
}

impl Key {
    /// Create a string key.
    pub fn name(name: impl Into<String>) -> Self {
        Key::Name(name.into())
    }

    /// Get this key as a string, if it is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{name}"),
            Key::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index as i64)
    }
}
