//! Per-call resolution state.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::types::{Key, Mapping, TreePath};

/// Records which `(path, key)` pairs a locale-tagged entry has claimed.
///
/// Once a key is locked at a path, no sibling resolving to the same key can
/// replace it. Precedence comes from the lock, never from sibling order.
#[derive(Debug, Default)]
pub struct PriorityTracker {
    locked: HashSet<(TreePath, String)>,
}

impl PriorityTracker {
    /// Create a tracker with nothing locked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` has been claimed at `path`.
    pub fn is_locked(&self, path: &TreePath, key: &str) -> bool {
        self.locked.contains(&(path.clone(), key.to_string()))
    }

    /// Claim `key` at `path`.
    pub fn lock(&mut self, path: &TreePath, key: &str) {
        self.locked.insert((path.clone(), key.to_string()));
    }
}

/// Keys whose extraction-marked sequence values need a `key@` alias once
/// their parent mapping is rebuilt.
#[derive(Debug, Default)]
pub struct ExtractionMarks {
    pending: HashMap<TreePath, IndexSet<String>>,
}

impl ExtractionMarks {
    /// Create an empty set of marks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that `key` below `path` was marked for extraction.
    pub fn mark(&mut self, path: &TreePath, key: &str) {
        self.pending
            .entry(path.clone())
            .or_default()
            .insert(key.to_string());
    }

    /// Add a `key@` alias for every marked key of `path` that holds a
    /// sequence in `mapping`, then forget the marks of `path`.
    pub fn restore(&mut self, path: &TreePath, mapping: &mut Mapping) {
        let Some(keys) = self.pending.remove(path) else {
            return;
        };
        for key in keys {
            let Some(value) = mapping.get(&Key::name(key.as_str())) else {
                continue;
            };
            if !value.is_sequence() {
                continue;
            }
            let alias = value.clone();
            tracing::trace!(%path, key = key.as_str(), "restoring extraction alias");
            mapping.insert(Key::name(format!("{key}@")), alias);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tree;

    #[test]
    fn locks_are_scoped_to_their_path() {
        let mut tracker = PriorityTracker::new();
        let root = TreePath::root();
        let nested = root.child(&Key::name("meta"));
        tracker.lock(&root, "title");
        assert!(tracker.is_locked(&root, "title"));
        assert!(!tracker.is_locked(&nested, "title"));
        assert!(!tracker.is_locked(&root, "title@fr"));
    }

    #[test]
    fn restore_aliases_only_sequences_and_clears_marks() {
        let root = TreePath::root();
        let mut marks = ExtractionMarks::new();
        marks.mark(&root, "items");
        marks.mark(&root, "name");
        marks.mark(&root, "missing");

        let mut mapping = Mapping::new();
        mapping.insert(Key::name("items"), Tree::Sequence(vec!["x".into()]));
        mapping.insert(Key::name("name"), "scalar".into());
        marks.restore(&root, &mut mapping);

        assert_eq!(mapping.len(), 3);
        assert_eq!(
            mapping.get(&Key::name("items@")),
            Some(&Tree::Sequence(vec!["x".into()]))
        );

        let mut again = Mapping::new();
        again.insert(Key::name("items"), Tree::Sequence(vec!["y".into()]));
        marks.restore(&root, &mut again);
        assert_eq!(again.len(), 1);
    }
}
