//! The three parameter resolver strategies.

use bon::Builder;

use crate::pattern::{PatternCache, PatternError};
use crate::types::{Key, Mapping, Tree};

/// Everything a resolver sees about one `key@param.value` entry.
#[derive(Debug)]
pub struct ParamRequest<'a> {
    /// The mapping holding the entry, as written (before untagging).
    pub node: &'a Mapping,
    /// The key with its tag removed.
    pub untagged_key: &'a str,
    /// The parameter name from the tag.
    pub param_name: &'a str,
    /// The parameter value from the tag.
    pub param_value: &'a str,
    /// The entry's value, already untagged.
    pub value: Tree,
    /// The locale being untagged for, if any.
    pub locale: Option<&'a str>,
}

impl ParamRequest<'_> {
    fn accept(self) -> Option<(Key, Tree)> {
        Some((Key::name(self.untagged_key), self.value))
    }
}

/// Decides whether a parameterized entry applies to the current context.
///
/// Resolvers return the entry's replacement `(key, value)`, or `None` to drop
/// it. Every comparison is a full-string regex match.
#[derive(Debug, Clone)]
pub enum ParamResolver {
    /// The tag value is a pattern matched against a fixed string.
    Literal(LiteralRegex),
    /// The tag value names a field holding a pattern matched against a fixed
    /// string.
    Field(FieldRegex),
    /// The tag value names a field holding a pattern matched against the
    /// locale.
    LocaleField(LocaleFieldRegex),
}

impl ParamResolver {
    /// Shorthand for a [`LiteralRegex`] resolver.
    pub fn literal(value: impl Into<String>) -> Self {
        ParamResolver::Literal(LiteralRegex::new(value))
    }

    /// Resolve one parameterized entry.
    pub fn resolve(
        &self,
        request: ParamRequest<'_>,
        patterns: &mut PatternCache,
    ) -> Result<Option<(Key, Tree)>, PatternError> {
        match self {
            ParamResolver::Literal(literal) => literal.resolve(request, patterns),
            ParamResolver::Field(field) => field.resolve(request, patterns),
            ParamResolver::LocaleField(locale) => locale.resolve(request, patterns),
        }
    }
}

impl From<LiteralRegex> for ParamResolver {
    fn from(resolver: LiteralRegex) -> Self {
        ParamResolver::Literal(resolver)
    }
}

impl From<FieldRegex> for ParamResolver {
    fn from(resolver: FieldRegex) -> Self {
        ParamResolver::Field(resolver)
    }
}

impl From<LocaleFieldRegex> for ParamResolver {
    fn from(resolver: LocaleFieldRegex) -> Self {
        ParamResolver::LocaleField(resolver)
    }
}

/// Matches the tag value, used as a pattern, against a held string.
///
/// With `env => LiteralRegex::new("production")`, `url@env.prod.*` is kept
/// and `url@env.prod` is dropped. An empty held string never matches.
#[derive(Debug, Clone)]
pub struct LiteralRegex {
    value: String,
}

impl LiteralRegex {
    /// Create a resolver comparing against `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The string the tag patterns are matched against.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn resolve(
        &self,
        request: ParamRequest<'_>,
        patterns: &mut PatternCache,
    ) -> Result<Option<(Key, Tree)>, PatternError> {
        if self.value.is_empty() {
            return Ok(None);
        }
        if !patterns.full_match(request.param_value, &self.value)? {
            return Ok(None);
        }
        Ok(request.accept())
    }
}

/// Matches a held string against a pattern read from a document field.
///
/// The tag value names the field. The field is looked up on the mapping that
/// holds the entry, then in the collection defaults, then in the pod
/// defaults. An entry with no pattern anywhere in that chain is dropped.
///
/// # Example
///
/// ```
/// use untag::{FieldRegex, Key, Mapping, Tree};
///
/// let mut collection = Mapping::new();
/// collection.insert(Key::name("launch"), Tree::from("prod.*"));
/// let resolver = FieldRegex::builder()
///     .value("production")
///     .collection(collection)
///     .build();
/// assert_eq!(resolver.value(), "production");
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct FieldRegex {
    /// The string the field patterns are matched against.
    value: String,

    /// Collection-level field defaults.
    #[builder(default)]
    collection: Mapping,

    /// Pod-level field defaults.
    #[builder(default)]
    podspec: Mapping,
}

impl FieldRegex {
    /// The string the field patterns are matched against.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn resolve(
        &self,
        request: ParamRequest<'_>,
        patterns: &mut PatternCache,
    ) -> Result<Option<(Key, Tree)>, PatternError> {
        let chain = FallbackChain {
            node: request.node,
            collection: &self.collection,
            podspec: &self.podspec,
        };
        let Some(pattern) = chain.pattern_for(request.param_value) else {
            return Ok(None);
        };
        if !patterns.full_match(&pattern, &self.value)? {
            return Ok(None);
        }
        Ok(request.accept())
    }
}

/// Matches the locale against a pattern read from a document field.
///
/// Uses the same field chain as [`FieldRegex`]. Entries are always dropped
/// when no locale is being untagged for.
#[derive(Debug, Clone, Default, Builder)]
pub struct LocaleFieldRegex {
    /// Collection-level localization defaults.
    #[builder(default)]
    collection: Mapping,

    /// Pod-level localization defaults.
    #[builder(default)]
    podspec: Mapping,
}

impl LocaleFieldRegex {
    /// Build from a pod spec and a collection definition.
    ///
    /// Only their `localization` sections are consulted. A missing or
    /// non-mapping section is treated as empty.
    pub fn from_sections(podspec: &Tree, collection: &Tree) -> Self {
        Self {
            collection: localization_section(collection),
            podspec: localization_section(podspec),
        }
    }

    fn resolve(
        &self,
        request: ParamRequest<'_>,
        patterns: &mut PatternCache,
    ) -> Result<Option<(Key, Tree)>, PatternError> {
        let Some(locale) = request.locale else {
            return Ok(None);
        };
        let chain = FallbackChain {
            node: request.node,
            collection: &self.collection,
            podspec: &self.podspec,
        };
        let Some(pattern) = chain.pattern_for(request.param_value) else {
            return Ok(None);
        };
        if !patterns.full_match(&pattern, locale)? {
            return Ok(None);
        }
        Ok(request.accept())
    }
}

fn localization_section(tree: &Tree) -> Mapping {
    tree.get("localization")
        .and_then(Tree::as_mapping)
        .cloned()
        .unwrap_or_default()
}

/// Node, collection, then pod lookup of a pattern-valued field.
struct FallbackChain<'a> {
    node: &'a Mapping,
    collection: &'a Mapping,
    podspec: &'a Mapping,
}

impl FallbackChain<'_> {
    /// The first present, non-empty pattern for `field`.
    fn pattern_for(&self, field: &str) -> Option<String> {
        let key = Key::name(field);
        [self.node, self.collection, self.podspec]
            .into_iter()
            .find_map(|table| table.get(&key).and_then(pattern_text))
    }
}

/// The pattern text of a field value. Only strings and numbers qualify.
fn pattern_text(value: &Tree) -> Option<String> {
    match value {
        Tree::String(s) if !s.is_empty() => Some(s.clone()),
        Tree::Int(n) => Some(n.to_string()),
        Tree::Float(n) => Some(n.to_string()),
        _ => None,
    }
}
