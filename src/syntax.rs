//! The symbolic expression IR.
//!
//! Expressions are immutable trees shared through `Rc`. Every variant is `#[non_exhaustive]`,
//! outside of this crate they can only be built through the checked constructors in `typing.rs`
//! (and the infallible leaves in `dsl.rs`), so an `Expression` that exists is always well-typed.

mod identifier;

pub use identifier::*;

use std::{fmt::Display, ops::Deref, rc::Rc};

/// Address of an object or array in the heap. `0` is never handed out.
pub type Address = i64;

pub type FieldIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    #[non_exhaustive]
    SymbolicVar {
        // unconstrained input, arrays carry their inner type in `type_`
        var: Identifier,
        type_: RuntimeType,
    },
    #[non_exhaustive]
    Lit { lit: Lit },
    /// Identity of a concretely allocated object or array.
    #[non_exhaustive]
    Ref { ref_: Address },
    #[non_exhaustive]
    BinOp {
        bin_op: BinOp,
        lhs: Rc<Expression>,
        rhs: Rc<Expression>,
    },
    #[non_exhaustive]
    LogicalOp {
        logical_op: LogicalOp,
        operands: Vec<Rc<Expression>>,
    },
    #[non_exhaustive]
    UnOp { un_op: UnOp, value: Rc<Expression> },
    #[non_exhaustive]
    Conditional {
        guard: Rc<Expression>,
        true_: Rc<Expression>,
        false_: Rc<Expression>,
    },
    /// Uninterpreted function signature.
    #[non_exhaustive]
    FunctionDecl { decl: Rc<FunctionDecl> },
    #[non_exhaustive]
    FunctionCall {
        decl: Rc<FunctionDecl>,
        arguments: Vec<Rc<Expression>>,
    },
    /// `object` with `field` updated to `value`, `object` itself is left untouched.
    #[non_exhaustive]
    FieldAssign {
        object: Rc<Expression>,
        field: FieldIndex,
        value: Rc<Expression>,
        struct_tag: Identifier,
    },
    /// Reads `field` of `object`. `prior` is the object state right before the most recent write
    /// to this field, `None` if the field was never written.
    #[non_exhaustive]
    FieldAccess {
        object: Rc<Expression>,
        field: FieldIndex,
        prior: Option<Rc<Expression>>,
        struct_tag: Identifier,
        type_: RuntimeType,
    },
}

impl Expression {
    pub const TRUE: Expression = Expression::Lit {
        lit: Lit::BoolLit { bool_value: true },
    };
    pub const FALSE: Expression = Expression::Lit {
        lit: Lit::BoolLit { bool_value: false },
    };

    pub fn bool(v: bool) -> Rc<Expression> {
        if v {
            Rc::new(Expression::TRUE)
        } else {
            Rc::new(Expression::FALSE)
        }
    }

    pub fn int(v: i64) -> Rc<Expression> {
        Rc::new(Expression::Lit {
            lit: Lit::IntLit { int_value: v },
        })
    }

    pub fn reference(ref_: Address) -> Rc<Expression> {
        Rc::new(Expression::Ref { ref_ })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    /// Array element read, `lhs[rhs]`.
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
    Implies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Negative,
    Negate,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lit {
    BoolLit { bool_value: bool },
    IntLit { int_value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<RuntimeType>,
    pub return_type: RuntimeType,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeType {
    IntRuntimeType,
    BoolRuntimeType,
    ArrayRuntimeType {
        inner_type: Box<RuntimeType>,
    },
    FunctionRuntimeType {
        params: Vec<RuntimeType>,
        return_type: Box<RuntimeType>,
    },
    ObjectRuntimeType,
    ReferenceRuntimeType,
}

impl RuntimeType {
    pub fn array_of(inner_type: RuntimeType) -> RuntimeType {
        RuntimeType::ArrayRuntimeType {
            inner_type: Box::new(inner_type),
        }
    }

    pub fn get_inner_array_type(&self) -> Option<RuntimeType> {
        if let RuntimeType::ArrayRuntimeType { inner_type } = self {
            return Some(inner_type.deref().clone());
        }
        None
    }

    /// Objects and references, both are represented by their identity in the solver.
    pub fn is_heap_type(&self) -> bool {
        matches!(
            self,
            RuntimeType::ObjectRuntimeType | RuntimeType::ReferenceRuntimeType
        )
    }

    pub fn is_function_type(&self) -> bool {
        matches!(self, RuntimeType::FunctionRuntimeType { .. })
    }
}

impl Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::IntRuntimeType => write!(f, "int"),
            RuntimeType::BoolRuntimeType => write!(f, "bool"),
            RuntimeType::ArrayRuntimeType { inner_type } => write!(f, "{}[]", inner_type),
            RuntimeType::FunctionRuntimeType {
                params,
                return_type,
            } => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") -> {}", return_type)
            }
            RuntimeType::ObjectRuntimeType => write!(f, "object"),
            RuntimeType::ReferenceRuntimeType => write!(f, "reference"),
        }
    }
}
