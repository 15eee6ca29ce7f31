use std::fmt::{self, Display, Formatter};

use super::Key;

/// The keys leading from the root of a tree to one of its nodes.
///
/// Paths identify nodes for the duration of a single untagging call and are
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath(Vec<Key>);

impl TreePath {
    /// The path of the root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// The path of `key` below this node.
    pub fn child(&self, key: &Key) -> Self {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend_from_slice(&self.0);
        keys.push(key.clone());
        Self(keys)
    }
}

impl Display for TreePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for key in &self.0 {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}
