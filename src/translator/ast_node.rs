use std::{convert::TryFrom, rc::Rc};

use z3::{
    ast::{Array, Ast, Bool, Dynamic, Int},
    Context, FuncDecl,
};

use crate::{
    error::{unsupported, Error, Result},
    syntax::RuntimeType,
};

/// A solver term produced by the translator.
#[derive(Debug, Clone)]
pub enum AstNode<'ctx> {
    Bool(Bool<'ctx>),
    Int(Int<'ctx>),
    Array(Array<'ctx>),
    Function(Rc<FuncDecl<'ctx>>),
}

impl<'ctx> AstNode<'ctx> {
    pub fn add(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Int(Int::try_from(self)? + Int::try_from(other)?))
    }

    pub fn sub(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Int(Int::try_from(self)? - Int::try_from(other)?))
    }

    pub fn mul(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Int(Int::try_from(self)? * Int::try_from(other)?))
    }

    pub fn div(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Int(Int::try_from(self)? / Int::try_from(other)?))
    }

    pub fn _mod(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Int(
            Int::try_from(self)?.modulo(&Int::try_from(other)?),
        ))
    }

    pub fn eq(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        match self {
            AstNode::Bool(b) => Ok(AstNode::Bool(b._eq(&Bool::try_from(other)?))),
            AstNode::Int(i) => Ok(AstNode::Bool(i._eq(&Int::try_from(other)?))),
            AstNode::Array(a) => Ok(AstNode::Bool(a._eq(&Array::try_from(other)?))),
            AstNode::Function(_) => Err(unsupported("equality of uninterpreted functions")),
        }
    }

    pub fn neq(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        self.eq(other)?.negate()
    }

    pub fn lt(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Bool(
            Int::try_from(self)?.lt(&Int::try_from(other)?),
        ))
    }

    pub fn gt(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Bool(
            Int::try_from(self)?.gt(&Int::try_from(other)?),
        ))
    }

    pub fn lte(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Bool(
            Int::try_from(self)?.le(&Int::try_from(other)?),
        ))
    }

    pub fn gte(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Bool(
            Int::try_from(self)?.ge(&Int::try_from(other)?),
        ))
    }

    pub fn and(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        let lhs = Bool::try_from(self)?;
        let ctx = lhs.get_ctx();
        Ok(AstNode::Bool(Bool::and(ctx, &[&lhs, &Bool::try_from(other)?])))
    }

    pub fn or(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        let lhs = Bool::try_from(self)?;
        let ctx = lhs.get_ctx();
        Ok(AstNode::Bool(Bool::or(ctx, &[&lhs, &Bool::try_from(other)?])))
    }

    pub fn implies(self, other: AstNode<'ctx>) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Bool(
            Bool::try_from(self)?.implies(&Bool::try_from(other)?),
        ))
    }

    pub fn conditional(
        self,
        true_: AstNode<'ctx>,
        false_: AstNode<'ctx>,
    ) -> Result<AstNode<'ctx>> {
        let guard = Bool::try_from(self)?;
        match true_ {
            AstNode::Bool(true_) => Ok(AstNode::Bool(guard.ite(&true_, &Bool::try_from(false_)?))),
            AstNode::Int(true_) => Ok(AstNode::Int(guard.ite(&true_, &Int::try_from(false_)?))),
            AstNode::Array(true_) => Ok(AstNode::Array(
                guard.ite(&true_, &Array::try_from(false_)?),
            )),
            AstNode::Function(_) => Err(unsupported("conditional over uninterpreted functions")),
        }
    }

    pub fn negate(self) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Bool(Bool::try_from(self)?.not()))
    }

    pub fn negative(self) -> Result<AstNode<'ctx>> {
        Ok(AstNode::Int(Int::try_from(self)?.unary_minus()))
    }

    /// Reads `array[index]`, the element is typed by `inner_type`.
    pub fn select(self, index: AstNode<'ctx>, inner_type: &RuntimeType) -> Result<AstNode<'ctx>> {
        let element = Array::try_from(self)?.select(&Int::try_from(index)?);
        AstNode::from_dynamic(element, inner_type)
    }
}

impl<'ctx> AstNode<'ctx> {
    /// `None` for functions.
    pub fn get_ctx(&self) -> Option<&'ctx Context> {
        match self {
            AstNode::Bool(v) => Some(v.get_ctx()),
            AstNode::Int(v) => Some(v.get_ctx()),
            AstNode::Array(v) => Some(v.get_ctx()),
            AstNode::Function(_) => None,
        }
    }

    pub fn to_dynamic(&self) -> Result<Dynamic<'ctx>> {
        match self {
            AstNode::Bool(v) => Ok(Dynamic::from_ast(v)),
            AstNode::Int(v) => Ok(Dynamic::from_ast(v)),
            AstNode::Array(v) => Ok(Dynamic::from_ast(v)),
            AstNode::Function(_) => Err(unsupported("a function is not a value")),
        }
    }

    /// Heap values are carried as their identity, an integer.
    pub fn from_dynamic(value: Dynamic<'ctx>, type_: &RuntimeType) -> Result<AstNode<'ctx>> {
        let node = match type_ {
            RuntimeType::BoolRuntimeType => value.as_bool().map(AstNode::Bool),
            RuntimeType::IntRuntimeType
            | RuntimeType::ObjectRuntimeType
            | RuntimeType::ReferenceRuntimeType => value.as_int().map(AstNode::Int),
            RuntimeType::ArrayRuntimeType { .. } => value.as_array().map(AstNode::Array),
            RuntimeType::FunctionRuntimeType { .. } => None,
        };
        node.ok_or_else(|| unsupported(format!("solver term {} is not of type {}", value, type_)))
    }
}

impl<'ctx> PartialEq for AstNode<'ctx> {
    /// Terms from different contexts are never equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AstNode::Function(a), AstNode::Function(b)) => Rc::ptr_eq(a, b),
            (a, b) => match (a.get_ctx(), b.get_ctx()) {
                (Some(ctx_a), Some(ctx_b)) if std::ptr::eq(ctx_a, ctx_b) => match (a, b) {
                    (AstNode::Bool(a), AstNode::Bool(b)) => a == b,
                    (AstNode::Int(a), AstNode::Int(b)) => a == b,
                    (AstNode::Array(a), AstNode::Array(b)) => a == b,
                    _ => false,
                },
                _ => false,
            },
        }
    }
}

impl<'ctx> TryFrom<AstNode<'ctx>> for Bool<'ctx> {
    type Error = Error;

    fn try_from(value: AstNode<'ctx>) -> Result<Self> {
        if let AstNode::Bool(v) = value {
            Ok(v)
        } else {
            Err(unsupported(format!("expected a Bool term, got {:?}", value)))
        }
    }
}

impl<'ctx> TryFrom<AstNode<'ctx>> for Int<'ctx> {
    type Error = Error;

    fn try_from(value: AstNode<'ctx>) -> Result<Self> {
        if let AstNode::Int(v) = value {
            Ok(v)
        } else {
            Err(unsupported(format!("expected an Int term, got {:?}", value)))
        }
    }
}

impl<'ctx> TryFrom<AstNode<'ctx>> for Array<'ctx> {
    type Error = Error;

    fn try_from(value: AstNode<'ctx>) -> Result<Self> {
        if let AstNode::Array(v) = value {
            Ok(v)
        } else {
            Err(unsupported(format!("expected an Array term, got {:?}", value)))
        }
    }
}
