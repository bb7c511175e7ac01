mod prettyprint;
mod syntax;
mod typeable;
mod typing;

pub mod dsl;
pub mod error;
pub mod heap;

pub mod options;
pub mod session;
pub mod statistics;
pub mod translator;
pub mod z3_checker;

pub use error::{Error, Result};
pub use heap::{Memory, MemoryKind, Ref};
pub use options::Options;
pub use session::Session;
pub use syntax::*;
pub use translator::{sort_of, value_sort, AstNode, Translator};
pub use typeable::Typeable;
