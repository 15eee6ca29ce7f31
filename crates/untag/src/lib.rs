pub mod parser;
pub mod pattern;
pub mod resolver;
pub mod types;
pub mod walker;

pub use parser::{KeyClass, KeyForm, TaggedKey, classify, compute_suggestions};
pub use pattern::{PatternCache, PatternError};
pub use resolver::{
    FieldRegex, LiteralRegex, LocaleFieldRegex, ParamError, ParamRequest, ParamResolver,
    ParamTable,
};
pub use types::{Key, Mapping, Tree, TreePath};
pub use walker::{ExtractionMarks, PriorityTracker, UntagError, Untagger, untag};

/// Creates a [`ParamTable`] from name/resolver pairs.
///
/// Resolvers are converted via `Into<ParamResolver>`. Evaluates to
/// `Result<ParamTable, ParamError>` so that duplicate or malformed names are
/// reported before any tree is untagged.
///
/// # Example
///
/// ```
/// use untag::{LiteralRegex, ParamResolver, params};
///
/// let table = params! {
///     "env" => ParamResolver::literal("staging"),
///     "channel" => LiteralRegex::new("beta"),
/// }
/// .unwrap();
/// assert_eq!(table.len(), 2);
/// assert!(table.contains("env"));
///
/// let duplicate = params! { "env" => LiteralRegex::new("a"), "env" => LiteralRegex::new("b") };
/// assert!(duplicate.is_err());
/// ```
#[macro_export]
macro_rules! params {
    {} => {
        ::std::result::Result::<$crate::ParamTable, $crate::ParamError>::Ok($crate::ParamTable::new())
    };
    { $($name:expr => $resolver:expr),+ $(,)? } => {
        (|| -> ::std::result::Result<$crate::ParamTable, $crate::ParamError> {
            let mut table = $crate::ParamTable::new();
            $(
                table.register($name, $resolver)?;
            )+
            ::std::result::Result::Ok(table)
        })()
    };
}
