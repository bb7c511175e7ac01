//! Construction-time type checking of symbolic expressions.
//!
//! Every constructor validates its operands before producing a node, an ill-typed tree can
//! never be built.
//! The translation layer relies on this and dispatches purely on the operator and the static type.
use std::rc::Rc;

use itertools::Itertools;

use crate::{
    error::{arity_error, unification_error, unsupported, Result},
    syntax::*,
    typeable::{is_arithmetic, is_equality, is_ordering, Typeable},
};

/// Checks whether typeable A is of type B, returning an error when this is not the case.
/// And an empty Ok result otherwise.
fn matches_type<A, B>(type1: A, type2: B) -> Result<()>
where
    A: Typeable,
    B: Typeable,
{
    if !type1.is_of_type(type2.type_of()) {
        return Err(unification_error(type2.type_of(), type1.type_of()));
    }
    Ok(())
}

/// Function signatures are not values, they cannot appear as operands.
fn matches_value_type(type_: &RuntimeType) -> Result<()> {
    if contains_function_type(type_) {
        return Err(unification_error("a value type", type_.clone()));
    }
    Ok(())
}

fn matches_heap_type(type_: RuntimeType) -> Result<()> {
    if !type_.is_heap_type() {
        return Err(unification_error("object or reference", type_));
    }
    Ok(())
}

/// Field operations work on object states: an address or symbolic object below a chain of writes,
/// possibly selected by conditionals. A reference read out of a field carries no writes.
fn matches_heap_state(state: &Expression) -> Result<()> {
    matches_heap_type(state.type_of())?;
    match state {
        Expression::Ref { .. }
        | Expression::SymbolicVar { .. }
        | Expression::FieldAssign { .. } => Ok(()),
        Expression::Conditional { true_, false_, .. } => {
            matches_heap_state(true_)?;
            matches_heap_state(false_)
        }
        _ => Err(unsupported(format!("{} is not an object state", state))),
    }
}

fn contains_function_type(type_: &RuntimeType) -> bool {
    match type_ {
        RuntimeType::FunctionRuntimeType { .. } => true,
        RuntimeType::ArrayRuntimeType { inner_type } => contains_function_type(inner_type),
        _ => false,
    }
}

impl Expression {
    pub fn symbolic_var(var: impl Into<Identifier>, type_: RuntimeType) -> Result<Rc<Expression>> {
        matches_value_type(&type_)?;
        Ok(Rc::new(Expression::SymbolicVar {
            var: var.into(),
            type_,
        }))
    }

    pub fn bin_op(
        bin_op: BinOp,
        lhs: Rc<Expression>,
        rhs: Rc<Expression>,
    ) -> Result<Rc<Expression>> {
        type_binop(bin_op, &lhs, &rhs)?;
        Ok(Rc::new(Expression::BinOp { bin_op, lhs, rhs }))
    }

    pub fn logical_op(
        logical_op: LogicalOp,
        operands: Vec<Rc<Expression>>,
    ) -> Result<Rc<Expression>> {
        match logical_op {
            LogicalOp::Not if operands.len() != 1 => {
                return Err(arity_error("!", 1, operands.len()))
            }
            LogicalOp::Implies if operands.len() != 2 => {
                return Err(arity_error("==>", 2, operands.len()))
            }
            LogicalOp::And | LogicalOp::Or if operands.is_empty() => {
                return Err(arity_error(
                    format!("{:?}", logical_op),
                    "at least 1",
                    operands.len(),
                ))
            }
            _ => (),
        }
        for operand in &operands {
            matches_type(operand.as_ref(), RuntimeType::BoolRuntimeType)?;
        }
        Ok(Rc::new(Expression::LogicalOp {
            logical_op,
            operands,
        }))
    }

    pub fn un_op(un_op: UnOp, value: Rc<Expression>) -> Result<Rc<Expression>> {
        match un_op {
            UnOp::Negative => matches_type(value.as_ref(), RuntimeType::IntRuntimeType)?,
            UnOp::Negate => matches_type(value.as_ref(), RuntimeType::BoolRuntimeType)?,
        }
        Ok(Rc::new(Expression::UnOp { un_op, value }))
    }

    pub fn conditional(
        guard: Rc<Expression>,
        true_: Rc<Expression>,
        false_: Rc<Expression>,
    ) -> Result<Rc<Expression>> {
        matches_type(guard.as_ref(), RuntimeType::BoolRuntimeType)?;
        matches_value_type(&true_.type_of())?;
        matches_type(false_.as_ref(), true_.as_ref())?;
        Ok(Rc::new(Expression::Conditional {
            guard,
            true_,
            false_,
        }))
    }

    pub fn function_decl(
        name: impl Into<Identifier>,
        params: Vec<RuntimeType>,
        return_type: RuntimeType,
    ) -> Result<Rc<Expression>> {
        for param in &params {
            matches_value_type(param)?;
        }
        matches_value_type(&return_type)?;
        Ok(Rc::new(Expression::FunctionDecl {
            decl: Rc::new(FunctionDecl {
                name: name.into(),
                params,
                return_type,
            }),
        }))
    }

    /// `function` must be a function declaration, the arguments must match its signature.
    pub fn function_call(
        function: &Expression,
        arguments: Vec<Rc<Expression>>,
    ) -> Result<Rc<Expression>> {
        let decl = match function {
            Expression::FunctionDecl { decl } => decl.clone(),
            other => return Err(unification_error("a function declaration", other.type_of())),
        };
        if decl.params.len() != arguments.len() {
            return Err(arity_error(&decl.name, decl.params.len(), arguments.len()));
        }
        for (param, argument) in decl.params.iter().zip_eq(&arguments) {
            matches_type(argument.as_ref(), param.clone())?;
        }
        Ok(Rc::new(Expression::FunctionCall { decl, arguments }))
    }

    pub fn field_assign(
        object: Rc<Expression>,
        field: FieldIndex,
        value: Rc<Expression>,
        struct_tag: impl Into<Identifier>,
    ) -> Result<Rc<Expression>> {
        matches_heap_state(&object)?;
        matches_value_type(&value.type_of())?;
        Ok(Rc::new(Expression::FieldAssign {
            object,
            field,
            value,
            struct_tag: struct_tag.into(),
        }))
    }

    pub fn field_access(
        object: Rc<Expression>,
        field: FieldIndex,
        prior: Option<Rc<Expression>>,
        struct_tag: impl Into<Identifier>,
        type_: RuntimeType,
    ) -> Result<Rc<Expression>> {
        matches_heap_state(&object)?;
        if let Some(prior) = &prior {
            matches_heap_state(prior)?;
        }
        matches_value_type(&type_)?;
        Ok(Rc::new(Expression::FieldAccess {
            object,
            field,
            prior,
            struct_tag: struct_tag.into(),
            type_,
        }))
    }
}

/// Verifies the operand types of a binary operator, returning the result type.
fn type_binop(binop: BinOp, exp1: &Expression, exp2: &Expression) -> Result<RuntimeType> {
    if is_arithmetic(binop) {
        matches_type(exp1, RuntimeType::IntRuntimeType)?;
        matches_type(exp2, RuntimeType::IntRuntimeType)?;
        Ok(RuntimeType::IntRuntimeType)
    } else if is_equality(binop) {
        matches_value_type(&exp1.type_of())?;
        matches_type(exp2, exp1)?;
        Ok(RuntimeType::BoolRuntimeType)
    } else if is_ordering(binop) {
        matches_type(exp1, RuntimeType::IntRuntimeType)?;
        matches_type(exp2, RuntimeType::IntRuntimeType)?;
        Ok(RuntimeType::BoolRuntimeType)
    } else if binop == BinOp::Select {
        let array = exp1.type_of();
        let inner_type = array
            .get_inner_array_type()
            .ok_or_else(|| unification_error("an array", array.clone()))?;
        matches_type(exp2, RuntimeType::IntRuntimeType)?;
        Ok(inner_type)
    } else {
        unreachable!("missing case in type_binop")
    }
}
