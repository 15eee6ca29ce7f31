//! Tree walking and rewriting.
//!
//! This module applies the key grammar and the parameter resolvers to every
//! mapping entry of a tree and rebuilds the tree bottom-up. All bookkeeping
//! lives in per-call state, so concurrent calls never share anything.

mod error;
mod state;
mod untagger;

pub use error::UntagError;
pub use state::{ExtractionMarks, PriorityTracker};
pub use untagger::{Untagger, untag};
