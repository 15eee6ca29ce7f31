//! Key classification against the tag suffix grammar.
//!
//! Recognized forms, checked in this order:
//! - `key@#` translator comment
//! - `key@` extraction marker, stripped before the remaining checks
//! - `key@<param>.<value>` parameterized tag, for registered params only
//! - `key@<locale regex>` locale tag
//! - anything else is a plain key

use winnow::combinator::separated_pair;
use winnow::prelude::*;
use winnow::token::{rest, take_till};

use super::suggest::compute_suggestions;
use crate::resolver::ParamTable;

/// The disposition class of a string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass<'k> {
    /// `key@#`: dropped unconditionally.
    Comment,
    /// Any other key, with its extraction marker (if any) removed.
    Tagged(TaggedKey<'k>),
}

/// A non-comment key after the extraction marker has been stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedKey<'k> {
    /// The key with a trailing `@` removed.
    pub stripped: &'k str,
    /// Whether the key carried a trailing `@`.
    pub extraction_marked: bool,
    /// The tag form of the stripped key.
    pub form: KeyForm<'k>,
}

/// The tag carried by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyForm<'k> {
    /// No tag: the key passes through as written.
    Plain,
    /// `untagged@param_name.param_value`
    Parameterized {
        untagged: &'k str,
        param_name: &'k str,
        param_value: &'k str,
    },
    /// `untagged@pattern`
    Locale { untagged: &'k str, pattern: &'k str },
}

/// Classify a string key.
///
/// Only names registered in `params` are recognized as parameters; any other
/// `@name.value` suffix is read as a locale pattern. Parameters are tried
/// first because a locale pattern would accept every parameter suffix.
///
/// # Example
///
/// ```
/// use untag::{KeyClass, KeyForm, classify};
///
/// let KeyClass::Tagged(key) = classify("title@fr", None) else {
///     panic!("not a comment");
/// };
/// assert_eq!(key.form, KeyForm::Locale { untagged: "title", pattern: "fr" });
/// ```
pub fn classify<'k>(key: &'k str, params: Option<&ParamTable>) -> KeyClass<'k> {
    if key.ends_with("@#") {
        return KeyClass::Comment;
    }

    let (stripped, extraction_marked) = match key.strip_suffix('@') {
        Some(stripped) => (stripped, true),
        None => (key, false),
    };

    KeyClass::Tagged(TaggedKey {
        stripped,
        extraction_marked,
        form: tag_form(stripped, params),
    })
}

fn tag_form<'k>(key: &'k str, params: Option<&ParamTable>) -> KeyForm<'k> {
    let Some((untagged, tail)) = key.rsplit_once('@') else {
        return KeyForm::Plain;
    };
    if tail.is_empty() {
        return KeyForm::Plain;
    }

    let param = param_tail.parse(tail).ok();
    if let (Some(table), Some((param_name, param_value))) = (params, param) {
        if table.contains(param_name) {
            return KeyForm::Parameterized {
                untagged,
                param_name,
                param_value,
            };
        }
        warn_near_miss(key, param_name, table);
    }

    KeyForm::Locale {
        untagged,
        pattern: tail,
    }
}

/// Parse `name.value`, splitting at the first `.`.
fn param_tail<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    separated_pair(
        take_till(1.., '.'),
        '.',
        rest.verify(|value: &str| !value.is_empty()),
    )
    .parse_next(input)
}

/// Two or three letters may be a language subtag (`title@en.US`), so such
/// near misses are only reported at debug level.
const LANGUAGE_SUBTAG_MAX_LEN: usize = 3;

fn warn_near_miss(key: &str, name: &str, table: &ParamTable) {
    let suggestions = compute_suggestions(name, table.names());
    if suggestions.is_empty() {
        return;
    }
    let suggestions = suggestions.join(", ");
    if name.len() <= LANGUAGE_SUBTAG_MAX_LEN {
        tracing::debug!(
            key,
            param = name,
            suggestions = %suggestions,
            "tag resembles a parameter, treating it as a locale pattern"
        );
    } else {
        tracing::warn!(
            key,
            param = name,
            suggestions = %suggestions,
            "tag looks like an unregistered parameter, treating it as a locale pattern"
        );
    }
}
