//! Shorthands for the leaves of an expression tree, these cannot fail.
use std::rc::Rc;

use crate::syntax::{Expression, Identifier, RuntimeType};

pub fn int_var(var: impl Into<Identifier>) -> Rc<Expression> {
    Rc::new(Expression::SymbolicVar {
        var: var.into(),
        type_: RuntimeType::IntRuntimeType,
    })
}

pub fn bool_var(var: impl Into<Identifier>) -> Rc<Expression> {
    Rc::new(Expression::SymbolicVar {
        var: var.into(),
        type_: RuntimeType::BoolRuntimeType,
    })
}

/// A symbolic object, its identity is unconstrained.
pub fn object_var(var: impl Into<Identifier>) -> Rc<Expression> {
    Rc::new(Expression::SymbolicVar {
        var: var.into(),
        type_: RuntimeType::ObjectRuntimeType,
    })
}

/// Panics if `inner_type` is or contains a function type.
pub fn array_var(var: impl Into<Identifier>, inner_type: RuntimeType) -> Rc<Expression> {
    let var = var.into();
    Expression::symbolic_var(var.clone(), RuntimeType::array_of(inner_type))
        .unwrap_or_else(|err| panic!("array variable '{}': {}", var, err))
}
