//! Key grammar parsing.
//!
//! Classifies mapping keys against the `@` suffix grammar without looking
//! at the tree they belong to.

mod grammar;
mod suggest;

pub use grammar::{KeyClass, KeyForm, TaggedKey, classify};
pub use suggest::compute_suggestions;
