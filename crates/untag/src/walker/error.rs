use thiserror::Error;

use crate::pattern::PatternError;
use crate::types::TreePath;

/// An error that aborted an untagging call.
#[derive(Debug, Error)]
pub enum UntagError {
    /// A locale or parameter pattern is not a valid regular expression.
    #[error("invalid pattern in key '{key}' at {path}")]
    InvalidPattern {
        path: TreePath,
        key: String,
        #[source]
        source: PatternError,
    },
}
