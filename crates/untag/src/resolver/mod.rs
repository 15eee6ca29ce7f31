//! Parameter resolvers for `key@param.value` tags.
//!
//! A resolver decides whether a parameterized entry applies to the current
//! context. Resolvers are registered by name in a [`ParamTable`]; the set of
//! strategies is closed.

mod error;
mod param;
mod table;

pub use error::ParamError;
pub use param::{FieldRegex, LiteralRegex, LocaleFieldRegex, ParamRequest, ParamResolver};
pub use table::ParamTable;
