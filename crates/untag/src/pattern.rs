//! Full-string regex matching for tag patterns.
//!
//! Locale fragments and parameter values are regular expressions that must
//! match the whole candidate, never a substring. Compiled patterns are kept
//! for the duration of one untagging call.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// A tag pattern that is not a valid regular expression.
#[derive(Debug, Error)]
#[error("cannot compile pattern '{pattern}': {source}")]
pub struct PatternError {
    /// The pattern text as written in the content.
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Compiled anchored patterns keyed by their source text.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Regex>,
}

impl PatternCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Test whether `pattern` matches all of `candidate`.
    ///
    /// The pattern is validated on its own before being wrapped as
    /// `^(?:pattern)$`, so unbalanced groups cannot escape the anchors.
    pub fn full_match(&mut self, pattern: &str, candidate: &str) -> Result<bool, PatternError> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.is_match(candidate));
        }

        let compile_error = |source| PatternError {
            pattern: pattern.to_string(),
            source,
        };
        Regex::new(pattern).map_err(compile_error)?;
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(compile_error)?;

        let matched = regex.is_match(candidate);
        self.compiled.insert(pattern.to_string(), regex);
        Ok(matched)
    }
}
