use std::borrow::Borrow;

use crate::syntax::{BinOp, Expression, FunctionDecl, Lit, RuntimeType, UnOp};

pub trait Typeable {
    fn type_of(&self) -> RuntimeType;

    fn is_of_type(&self, other: impl Typeable) -> bool {
        self.type_of() == other.type_of()
    }
}

impl<B: Borrow<Expression>> Typeable for B {
    /// Computed structurally from the children on every call.
    fn type_of(&self) -> RuntimeType {
        match self.borrow() {
            Expression::SymbolicVar { type_, .. } => type_.clone(),
            Expression::Lit { lit, .. } => lit.type_of(),
            Expression::Ref { .. } => RuntimeType::ReferenceRuntimeType,
            Expression::BinOp { bin_op, lhs, .. } => match bin_op {
                BinOp::Select => lhs
                    .type_of()
                    .get_inner_array_type()
                    .unwrap_or_else(|| unreachable!("select on a non-array expression")),
                op if is_arithmetic(*op) => RuntimeType::IntRuntimeType,
                _ => RuntimeType::BoolRuntimeType,
            },
            Expression::LogicalOp { .. } => RuntimeType::BoolRuntimeType,
            Expression::UnOp { un_op, .. } => match un_op {
                UnOp::Negative => RuntimeType::IntRuntimeType,
                UnOp::Negate => RuntimeType::BoolRuntimeType,
            },
            Expression::Conditional { true_, .. } => true_.type_of(),
            Expression::FunctionDecl { decl, .. } => decl.as_ref().type_of(),
            Expression::FunctionCall { decl, .. } => decl.return_type.clone(),
            Expression::FieldAssign { object, .. } => object.type_of(),
            Expression::FieldAccess { type_, .. } => type_.clone(),
        }
    }
}

impl Typeable for Lit {
    fn type_of(&self) -> RuntimeType {
        match self {
            Lit::BoolLit { .. } => RuntimeType::BoolRuntimeType,
            Lit::IntLit { .. } => RuntimeType::IntRuntimeType,
        }
    }
}

impl Typeable for RuntimeType {
    fn type_of(&self) -> RuntimeType {
        self.clone()
    }
}

impl Typeable for FunctionDecl {
    fn type_of(&self) -> RuntimeType {
        RuntimeType::FunctionRuntimeType {
            params: self.params.clone(),
            return_type: Box::new(self.return_type.clone()),
        }
    }
}

pub(crate) fn is_arithmetic(bin_op: BinOp) -> bool {
    use BinOp::*;
    [Plus, Minus, Multiply, Divide, Modulo].contains(&bin_op)
}

pub(crate) fn is_ordering(bin_op: BinOp) -> bool {
    use BinOp::*;
    [LessThan, LessThanEqual, GreaterThan, GreaterThanEqual].contains(&bin_op)
}

pub(crate) fn is_equality(bin_op: BinOp) -> bool {
    use BinOp::*;
    [Equal, NotEqual].contains(&bin_op)
}
