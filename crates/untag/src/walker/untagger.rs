//! Recursive untagging of content trees.
//!
//! Each mapping is rebuilt in two steps: every entry is first given a
//! disposition from its key (keep, drop, rename, or delegate to a parameter
//! resolver), then the kept values are untagged recursively and the mapping
//! is reassembled in its original order. Extraction aliases are restored
//! once the mapping is complete.

use bon::Builder;

use crate::parser::{KeyClass, KeyForm, classify};
use crate::pattern::{PatternCache, PatternError};
use crate::resolver::{ParamRequest, ParamTable};
use crate::types::{Key, Mapping, Tree, TreePath};
use crate::walker::UntagError;
use crate::walker::state::{ExtractionMarks, PriorityTracker};

/// Untag `tree` for a locale and a set of parameter resolvers.
///
/// Returns a new tree holding only the entries that apply:
/// - `key@#` comments are removed
/// - `key@<pattern>` entries survive as `key` only when `locale` matches the
///   whole pattern, and then take precedence over a plain `key` sibling
/// - `key@<param>.<value>` entries are kept or dropped by the resolver
///   registered for `param`, and dropped when there is none
/// - sequences under `key@` keep a `key@` alias next to their `key` entry
///
/// Without a locale no locale-tagged entry is kept. Without a table every
/// parameterized entry is dropped.
///
/// # Errors
///
/// Returns [`UntagError::InvalidPattern`] if a pattern that has to be
/// evaluated is not a valid regular expression.
///
/// # Example
///
/// ```
/// use untag::{Tree, untag};
///
/// let tree: Tree = serde_json::from_str(
///     r#"{"title@en": "A", "title@fr": "B", "title": "C", "title@#": "note"}"#,
/// )
/// .unwrap();
///
/// let french = untag(&tree, Some("fr"), None).unwrap();
/// assert_eq!(french.get("title"), Some(&Tree::from("B")));
///
/// let german = untag(&tree, Some("de"), None).unwrap();
/// assert_eq!(german.get("title"), Some(&Tree::from("C")));
/// ```
pub fn untag(
    tree: &Tree,
    locale: Option<&str>,
    params: Option<&ParamTable>,
) -> Result<Tree, UntagError> {
    let _span = tracing::debug_span!("untag", locale = ?locale).entered();
    Walk::new(locale, params).tree(&TreePath::root(), tree)
}

/// A reusable untagging configuration.
///
/// # Example
///
/// ```
/// use untag::{ParamResolver, ParamTable, Tree, Untagger};
///
/// let mut params = ParamTable::new();
/// params.register("env", ParamResolver::literal("production")).unwrap();
///
/// let untagger = Untagger::builder().locale("de_DE").params(params).build();
///
/// let tree: Tree = serde_json::from_str(
///     r#"{"url": "http://localhost", "url@env.prod.*": "https://example.com"}"#,
/// )
/// .unwrap();
/// let resolved = untagger.untag(&tree).unwrap();
/// assert_eq!(resolved.get("url"), Some(&Tree::from("https://example.com")));
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct Untagger {
    /// Locale identifier matched against `key@<pattern>` tags.
    #[builder(into)]
    locale: Option<String>,

    /// Resolvers for `key@<param>.<value>` tags.
    #[builder(default)]
    params: ParamTable,
}

impl Untagger {
    /// Create an untagger with no locale and no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured locale identifier, if any.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// The configured parameter resolvers.
    pub fn params(&self) -> &ParamTable {
        &self.params
    }

    /// Untag `tree` with this configuration. See [`untag`].
    pub fn untag(&self, tree: &Tree) -> Result<Tree, UntagError> {
        untag(tree, self.locale(), Some(&self.params))
    }
}

/// One string-keyed mapping entry.
#[derive(Clone, Copy)]
struct Entry<'n> {
    key: &'n Key,
    name: &'n str,
    value: &'n Tree,
    extraction_marked: bool,
}

/// A non-locale entry waiting for the locale locks of its mapping.
enum Pending<'n> {
    Plain {
        key: &'n str,
    },
    Param {
        untagged: &'n str,
        param_name: &'n str,
        param_value: &'n str,
    },
}

/// State of a single untagging call.
struct Walk<'a> {
    locale: Option<&'a str>,
    params: Option<&'a ParamTable>,
    priority: PriorityTracker,
    extraction: ExtractionMarks,
    patterns: PatternCache,
}

impl<'a> Walk<'a> {
    fn new(locale: Option<&'a str>, params: Option<&'a ParamTable>) -> Self {
        Self {
            locale,
            params,
            priority: PriorityTracker::new(),
            extraction: ExtractionMarks::new(),
            patterns: PatternCache::new(),
        }
    }

    fn tree(&mut self, path: &TreePath, tree: &Tree) -> Result<Tree, UntagError> {
        match tree {
            Tree::Mapping(node) => Ok(Tree::Mapping(self.mapping(path, node)?)),
            Tree::Sequence(items) => Ok(Tree::Sequence(self.sequence(path, items)?)),
            scalar => Ok(scalar.clone()),
        }
    }

    fn sequence(&mut self, path: &TreePath, items: &[Tree]) -> Result<Vec<Tree>, UntagError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.tree(&path.child(&Key::from(index)), item))
            .collect()
    }

    fn mapping(&mut self, path: &TreePath, node: &Mapping) -> Result<Mapping, UntagError> {
        let mut kept: Vec<Option<(Key, Tree)>> = Vec::with_capacity(node.len());
        let mut pending = Vec::new();

        // Locale-tagged entries are decided first so that their locks are in
        // place before any sibling claims the same key.
        for (index, (key, value)) in node.iter().enumerate() {
            kept.push(None);
            let Key::Name(name) = key else {
                kept[index] = Some((key.clone(), self.tree(&path.child(key), value)?));
                continue;
            };
            let KeyClass::Tagged(tagged) = classify(name, self.params) else {
                tracing::trace!(%path, key = name.as_str(), "dropping comment");
                continue;
            };
            let entry = Entry {
                key,
                name,
                value,
                extraction_marked: tagged.extraction_marked,
            };
            match tagged.form {
                KeyForm::Locale { untagged, pattern } => {
                    kept[index] = self.locale_entry(path, entry, untagged, pattern)?;
                }
                KeyForm::Plain => {
                    pending.push((index, entry, Pending::Plain {
                        key: tagged.stripped,
                    }));
                }
                KeyForm::Parameterized {
                    untagged,
                    param_name,
                    param_value,
                } => {
                    pending.push((index, entry, Pending::Param {
                        untagged,
                        param_name,
                        param_value,
                    }));
                }
            }
        }

        for (index, entry, disposition) in pending {
            kept[index] = self.pending_entry(path, node, entry, disposition)?;
        }

        let mut rebuilt = Mapping::with_capacity(node.len());
        for (key, value) in kept.into_iter().flatten() {
            rebuilt.insert(key, value);
        }
        self.extraction.restore(path, &mut rebuilt);
        Ok(rebuilt)
    }

    fn locale_entry(
        &mut self,
        path: &TreePath,
        entry: Entry<'_>,
        untagged: &str,
        pattern: &str,
    ) -> Result<Option<(Key, Tree)>, UntagError> {
        if self.priority.is_locked(path, entry.name) {
            tracing::trace!(%path, key = entry.name, "dropping entry for an already resolved key");
            return Ok(None);
        }
        // Extraction-marked locale entries are never selected.
        if entry.extraction_marked {
            tracing::trace!(%path, key = entry.name, "dropping extraction-marked locale entry");
            return Ok(None);
        }
        let Some(locale) = self.locale else {
            return Ok(None);
        };
        let matched = self
            .patterns
            .full_match(pattern, locale)
            .map_err(|source| invalid_pattern(path, entry.name, source))?;
        if !matched {
            tracing::trace!(%path, key = entry.name, locale, "locale does not match");
            return Ok(None);
        }
        if self.priority.is_locked(path, untagged) {
            tracing::trace!(%path, key = entry.name, "another locale entry already won");
            return Ok(None);
        }

        self.priority.lock(path, untagged);
        tracing::trace!(%path, key = entry.name, untagged, "locale entry selected");
        let value = self.tree(&path.child(entry.key), entry.value)?;
        Ok(Some((Key::name(untagged), value)))
    }

    fn pending_entry(
        &mut self,
        path: &TreePath,
        node: &Mapping,
        entry: Entry<'_>,
        disposition: Pending<'_>,
    ) -> Result<Option<(Key, Tree)>, UntagError> {
        if self.priority.is_locked(path, entry.name) {
            tracing::trace!(%path, key = entry.name, "dropping entry for an already resolved key");
            return Ok(None);
        }

        let resolved = match disposition {
            Pending::Plain { key } => {
                if self.priority.is_locked(path, key) {
                    tracing::trace!(%path, key = entry.name, "locale entry takes precedence");
                    return Ok(None);
                }
                let value = self.tree(&path.child(entry.key), entry.value)?;
                (Key::name(key), value)
            }
            Pending::Param {
                untagged,
                param_name,
                param_value,
            } => {
                // Resolvers keep the untagged key, so a lock on it drops the
                // entry before its value is walked or its resolver runs.
                if self.priority.is_locked(path, untagged) {
                    tracing::trace!(%path, key = entry.name, "locale entry takes precedence");
                    return Ok(None);
                }
                let resolution =
                    self.param_entry(path, node, entry, untagged, param_name, param_value)?;
                let Some(resolved) = resolution else {
                    return Ok(None);
                };
                resolved
            }
        };

        if entry.extraction_marked && entry.value.is_sequence() {
            if let Some(name) = resolved.0.as_name() {
                self.extraction.mark(path, name);
            }
        }
        Ok(Some(resolved))
    }

    fn param_entry(
        &mut self,
        path: &TreePath,
        node: &Mapping,
        entry: Entry<'_>,
        untagged: &str,
        param_name: &str,
        param_value: &str,
    ) -> Result<Option<(Key, Tree)>, UntagError> {
        let Some(resolver) = self.params.and_then(|params| params.resolver(param_name)) else {
            tracing::trace!(%path, key = entry.name, param = param_name, "no resolver configured");
            return Ok(None);
        };

        let value = self.tree(&path.child(entry.key), entry.value)?;
        let request = ParamRequest {
            node,
            untagged_key: untagged,
            param_name,
            param_value,
            value,
            locale: self.locale,
        };
        let resolution = resolver
            .resolve(request, &mut self.patterns)
            .map_err(|source| invalid_pattern(path, entry.name, source))?;
        if resolution.is_none() {
            tracing::trace!(%path, key = entry.name, param = param_name, "parameter does not apply");
        }
        Ok(resolution)
    }
}

fn invalid_pattern(path: &TreePath, key: &str, source: PatternError) -> UntagError {
    UntagError::InvalidPattern {
        path: path.clone(),
        key: key.to_string(),
        source,
    }
}
