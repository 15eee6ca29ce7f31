mod key;
mod path;
mod tree;

pub use key::Key;
pub use path::TreePath;
pub use tree::{Mapping, Tree};
