use std::fmt::Display;

use thiserror::Error;

use crate::{heap::Ref, syntax::RuntimeType, Identifier};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Expected type {expected} but is of type {actual}")]
    Unification {
        expected: String,
        actual: RuntimeType,
    },

    #[error("Operator '{operator}' expects {expected} operand(s), instead {actual} were given")]
    Arity {
        operator: String,
        expected: String,
        actual: usize,
    },

    /// The type has no solver sort. Construction-time checks should have prevented this.
    #[error("Type {0} cannot be mapped to a solver sort")]
    UnknownType(RuntimeType),

    /// No lowering rule exists for this node, an internal invariant was broken.
    #[error("Unsupported translation: {0}")]
    Unsupported(String),

    #[error("'{name}' was declared with type {expected}, but is used with type {actual}")]
    Redeclared {
        name: Identifier,
        expected: RuntimeType,
        actual: RuntimeType,
    },

    #[error("Invalid handle {handle:?}: {reason}")]
    InvalidHandle { handle: Ref, reason: String },

    #[error("Unable to build logger: {0}")]
    Logger(#[from] sloggers::Error),
}

pub fn unification_error(expected: impl Display, actual: RuntimeType) -> Error {
    Error::Unification {
        expected: expected.to_string(),
        actual,
    }
}

pub fn arity_error(operator: impl Display, expected: impl Display, actual: usize) -> Error {
    Error::Arity {
        operator: operator.to_string(),
        expected: expected.to_string(),
        actual,
    }
}

pub fn invalid_handle(handle: &Ref, reason: impl Into<String>) -> Error {
    Error::InvalidHandle {
        handle: handle.clone(),
        reason: reason.into(),
    }
}

pub fn unsupported(reason: impl Display) -> Error {
    Error::Unsupported(reason.to_string())
}
