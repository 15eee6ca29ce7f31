use thiserror::Error;

/// Errors that occur while registering parameter resolvers.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A resolver is already registered under this name.
    #[error("parameter '{name}' is already registered")]
    Duplicate { name: String },

    /// The name cannot be addressed by the `key@name.value` grammar.
    #[error("invalid parameter name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
}
