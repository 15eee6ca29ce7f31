//! Registry of parameter resolvers keyed by parameter name.

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::{ParamError, ParamResolver};

/// Parameter name -> resolver table handed to the untagger.
///
/// Names are validated when registered, so a table that was built
/// successfully can never fail during traversal. A name may also be
/// registered without a resolver; its tagged entries are then always
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct ParamTable {
    resolvers: IndexMap<String, Option<ParamResolver>>,
}

impl ParamTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver under `name`.
    ///
    /// Returns an error if the name is already taken or cannot appear in a
    /// `key@name.value` tag.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        resolver: impl Into<ParamResolver>,
    ) -> Result<(), ParamError> {
        self.insert(name.into(), Some(resolver.into()))
    }

    /// Register `name` with no resolver, so that every entry tagged with it is
    /// dropped.
    pub fn register_disabled(&mut self, name: impl Into<String>) -> Result<(), ParamError> {
        self.insert(name.into(), None)
    }

    fn insert(&mut self, name: String, resolver: Option<ParamResolver>) -> Result<(), ParamError> {
        validate_name(&name)?;
        match self.resolvers.entry(name) {
            Entry::Occupied(entry) => Err(ParamError::Duplicate {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(resolver);
                Ok(())
            }
        }
    }

    /// Whether `name` is registered, with or without a resolver.
    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    /// The resolver registered under `name`, if there is an enabled one.
    pub fn resolver(&self, name: &str) -> Option<&ParamResolver> {
        self.resolvers.get(name).and_then(Option::as_ref)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether no names are registered.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), ParamError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('@') {
        "name contains '@'"
    } else if name.contains('.') {
        "name contains '.'"
    } else {
        return Ok(());
    };
    Err(ParamError::InvalidName {
        name: name.to_string(),
        reason,
    })
}
