//! Lowering of symbolic expressions into Z3 terms.
//!
//! A `Translator` belongs to one analysis session. It interns every symbolic variable and
//! uninterpreted function by name, so translating the same variable twice yields the same term.
//!
//! Object fields are encoded with one solver array per `(struct_tag, field)`, indexed by the
//! identity of the object. A chain of `FieldAssign` nodes becomes a chain of stores on those
//! arrays, a `FieldAccess` becomes a select.

mod ast_node;

pub use ast_node::AstNode;

use std::{collections::HashMap, convert::TryFrom, rc::Rc};

use slog::{debug, trace, Logger};
use z3::{
    ast::{Array, Ast, Bool, Int},
    Context, FuncDecl, Sort,
};

use crate::{
    error::{unification_error, unsupported, Error, Result},
    statistics::Statistics,
    syntax::*,
    typeable::Typeable,
};

/// Solver sort of a value type. Functions, objects and references have none.
pub fn sort_of<'ctx>(ctx: &'ctx Context, type_: &RuntimeType) -> Result<Sort<'ctx>> {
    match type_ {
        RuntimeType::IntRuntimeType => Ok(Sort::int(ctx)),
        RuntimeType::BoolRuntimeType => Ok(Sort::bool(ctx)),
        RuntimeType::ArrayRuntimeType { inner_type } => {
            Ok(Sort::array(ctx, &Sort::int(ctx), &sort_of(ctx, inner_type)?))
        }
        _ => Err(Error::UnknownType(type_.clone())),
    }
}

/// Like `sort_of`, but objects and references are carried by their identity.
pub fn value_sort<'ctx>(ctx: &'ctx Context, type_: &RuntimeType) -> Result<Sort<'ctx>> {
    match type_ {
        RuntimeType::ObjectRuntimeType | RuntimeType::ReferenceRuntimeType => Ok(Sort::int(ctx)),
        RuntimeType::ArrayRuntimeType { inner_type } => Ok(Sort::array(
            ctx,
            &Sort::int(ctx),
            &value_sort(ctx, inner_type)?,
        )),
        _ => sort_of(ctx, type_),
    }
}

pub struct Translator<'ctx> {
    ctx: &'ctx Context,
    variables: HashMap<Identifier, (RuntimeType, AstNode<'ctx>)>,
    functions: HashMap<Identifier, (FunctionDecl, Rc<FuncDecl<'ctx>>)>,
    field_arrays: HashMap<(Identifier, FieldIndex), (RuntimeType, Array<'ctx>)>,
    statistics: Statistics,
    logger: Logger,
}

impl<'ctx> Translator<'ctx> {
    pub fn new(ctx: &'ctx Context, logger: Logger) -> Translator<'ctx> {
        Translator {
            ctx,
            variables: HashMap::new(),
            functions: HashMap::new(),
            field_arrays: HashMap::new(),
            statistics: Statistics::default(),
            logger,
        }
    }

    pub fn get_ctx(&self) -> &'ctx Context {
        self.ctx
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub(crate) fn measure_invoke_z3(&mut self) {
        self.statistics.measure_invoke_z3();
    }

    /// Forgets all interned variables, functions and field arrays.
    pub fn reset(&mut self) {
        debug!(self.logger, "reset";
            "variables" => self.variables.len(),
            "functions" => self.functions.len(),
            "field_arrays" => self.field_arrays.len()
        );
        self.variables.clear();
        self.functions.clear();
        self.field_arrays.clear();
        self.statistics = Statistics::default();
    }

    pub fn translate(&mut self, expression: &Expression) -> Result<AstNode<'ctx>> {
        self.statistics.measure_node();
        trace!(self.logger, "translate"; "expression" => %expression);

        match expression {
            Expression::SymbolicVar { var, type_ } => self.variable(var, type_),
            Expression::Lit { lit } => Ok(match lit {
                Lit::BoolLit { bool_value } => {
                    AstNode::Bool(Bool::from_bool(self.ctx, *bool_value))
                }
                Lit::IntLit { int_value } => AstNode::Int(Int::from_i64(self.ctx, *int_value)),
            }),
            Expression::Ref { ref_ } => Ok(AstNode::Int(Int::from_i64(self.ctx, *ref_))),
            Expression::BinOp {
                bin_op, lhs, rhs, ..
            } => {
                let l = self.translate_operand(lhs)?;
                let r = self.translate_operand(rhs)?;
                match bin_op {
                    BinOp::Plus => l.add(r),
                    BinOp::Minus => l.sub(r),
                    BinOp::Multiply => l.mul(r),
                    BinOp::Divide => l.div(r),
                    BinOp::Modulo => l._mod(r),
                    BinOp::Equal => l.eq(r),
                    BinOp::NotEqual => l.neq(r),
                    BinOp::LessThan => l.lt(r),
                    BinOp::LessThanEqual => l.lte(r),
                    BinOp::GreaterThan => l.gt(r),
                    BinOp::GreaterThanEqual => l.gte(r),
                    BinOp::Select => l.select(r, &expression.type_of()),
                }
            }
            Expression::LogicalOp {
                logical_op,
                operands,
            } => {
                let mut terms = operands
                    .iter()
                    .map(|operand| self.translate(operand))
                    .collect::<Result<Vec<_>>>()?
                    .into_iter();
                let first = terms
                    .next()
                    .ok_or_else(|| unsupported(format!("{:?} without operands", logical_op)))?;
                match logical_op {
                    LogicalOp::Not => first.negate(),
                    LogicalOp::Implies => {
                        let consequent = terms
                            .next()
                            .ok_or_else(|| unsupported("implication without consequent"))?;
                        first.implies(consequent)
                    }
                    LogicalOp::And => terms.try_fold(first, AstNode::and),
                    LogicalOp::Or => terms.try_fold(first, AstNode::or),
                }
            }
            Expression::UnOp { un_op, value } => {
                let value = self.translate(value)?;
                match un_op {
                    UnOp::Negative => value.negative(),
                    UnOp::Negate => value.negate(),
                }
            }
            Expression::Conditional {
                guard,
                true_,
                false_,
            } => {
                let guard = self.translate(guard)?;
                let true_ = self.translate_operand(true_)?;
                let false_ = self.translate_operand(false_)?;
                guard.conditional(true_, false_)
            }
            Expression::FunctionDecl { decl } => Ok(AstNode::Function(self.function(decl)?)),
            Expression::FunctionCall { decl, arguments } => {
                let function = self.function(decl)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.translate_operand(argument)?.to_dynamic())
                    .collect::<Result<Vec<_>>>()?;
                let arguments = arguments
                    .iter()
                    .map(|argument| argument as &dyn Ast<'ctx>)
                    .collect::<Vec<_>>();
                AstNode::from_dynamic(function.apply(&arguments), &decl.return_type)
            }
            Expression::FieldAssign {
                field,
                value,
                struct_tag,
                ..
            } => Ok(AstNode::Array(self.field_array(
                expression,
                struct_tag,
                *field,
                &value.type_of(),
            )?)),
            Expression::FieldAccess {
                object,
                field,
                prior,
                struct_tag,
                type_,
            } => {
                let array = match prior {
                    Some(_) => self.field_array(object, struct_tag, *field, type_)?,
                    None => self.initial_field_array(struct_tag, *field, type_)?,
                };
                let identity = self.identity(object)?;
                AstNode::from_dynamic(array.select(&identity), type_)
            }
        }
    }

    /// Heap-typed operands are replaced by their identity.
    fn translate_operand(&mut self, expression: &Expression) -> Result<AstNode<'ctx>> {
        if expression.type_of().is_heap_type() {
            Ok(AstNode::Int(self.identity(expression)?))
        } else {
            self.translate(expression)
        }
    }

    /// The integer standing for an object: its address, or an unconstrained constant for a
    /// symbolic object. Writes do not change the identity.
    fn identity(&mut self, object: &Expression) -> Result<Int<'ctx>> {
        match object {
            Expression::FieldAssign { object, .. } => self.identity(object),
            _ => Int::try_from(self.translate(object)?),
        }
    }

    /// The solver array for `(struct_tag, field)` after every write to it in the chain of `state`.
    fn field_array(
        &mut self,
        state: &Expression,
        struct_tag: &Identifier,
        field: FieldIndex,
        type_: &RuntimeType,
    ) -> Result<Array<'ctx>> {
        match state {
            Expression::FieldAssign {
                object,
                field: written,
                value,
                struct_tag: tag,
            } if written == &field && tag == struct_tag => {
                let value_type = value.type_of();
                if value_type != *type_ {
                    return Err(unification_error(type_, value_type));
                }
                let before = self.field_array(object, struct_tag, field, type_)?;
                let identity = self.identity(object)?;
                let value = self.translate_operand(value)?.to_dynamic()?;
                Ok(before.store(&identity, &value))
            }
            Expression::FieldAssign { object, .. } => {
                self.field_array(object, struct_tag, field, type_)
            }
            Expression::Conditional {
                guard,
                true_,
                false_,
            } => {
                let guard = Bool::try_from(self.translate(guard)?)?;
                let true_ = self.field_array(true_, struct_tag, field, type_)?;
                let false_ = self.field_array(false_, struct_tag, field, type_)?;
                Ok(guard.ite(&true_, &false_))
            }
            _ => self.initial_field_array(struct_tag, field, type_),
        }
    }

    /// The unconstrained array holding `field` of every `struct_tag` object before any write.
    fn initial_field_array(
        &mut self,
        struct_tag: &Identifier,
        field: FieldIndex,
        type_: &RuntimeType,
    ) -> Result<Array<'ctx>> {
        let key = (struct_tag.clone(), field);
        if let Some((declared, array)) = self.field_arrays.get(&key) {
            if declared != type_ {
                return Err(Error::Redeclared {
                    name: format!("{}.{}", struct_tag, field).into(),
                    expected: declared.clone(),
                    actual: type_.clone(),
                });
            }
            self.statistics.measure_cache_hit();
            return Ok(array.clone());
        }

        let name = format!("{}.{}", struct_tag, field);
        let array = Array::new_const(
            self.ctx,
            name.as_str(),
            &Sort::int(self.ctx),
            &value_sort(self.ctx, type_)?,
        );
        debug!(self.logger, "new field array"; "name" => &name, "type" => %type_);
        self.statistics.measure_field_array();
        self.field_arrays
            .insert(key, (type_.clone(), array.clone()));
        Ok(array)
    }

    fn variable(&mut self, var: &Identifier, type_: &RuntimeType) -> Result<AstNode<'ctx>> {
        if let Some((declared, node)) = self.variables.get(var) {
            if declared != type_ {
                return Err(Error::Redeclared {
                    name: var.clone(),
                    expected: declared.clone(),
                    actual: type_.clone(),
                });
            }
            self.statistics.measure_cache_hit();
            return Ok(node.clone());
        }

        let node = match type_ {
            RuntimeType::BoolRuntimeType => AstNode::Bool(Bool::new_const(self.ctx, var.as_str())),
            RuntimeType::IntRuntimeType
            | RuntimeType::ObjectRuntimeType
            | RuntimeType::ReferenceRuntimeType => {
                AstNode::Int(Int::new_const(self.ctx, var.as_str()))
            }
            RuntimeType::ArrayRuntimeType { inner_type } => AstNode::Array(Array::new_const(
                self.ctx,
                var.as_str(),
                &Sort::int(self.ctx),
                &value_sort(self.ctx, inner_type)?,
            )),
            RuntimeType::FunctionRuntimeType { .. } => {
                return Err(Error::UnknownType(type_.clone()))
            }
        };
        debug!(self.logger, "new variable"; "name" => %var, "type" => %type_);
        self.statistics.measure_interned_variable();
        self.variables
            .insert(var.clone(), (type_.clone(), node.clone()));
        Ok(node)
    }

    fn function(&mut self, decl: &FunctionDecl) -> Result<Rc<FuncDecl<'ctx>>> {
        if let Some((declared, function)) = self.functions.get(&decl.name) {
            if declared != decl {
                return Err(Error::Redeclared {
                    name: decl.name.clone(),
                    expected: declared.type_of(),
                    actual: decl.type_of(),
                });
            }
            self.statistics.measure_cache_hit();
            return Ok(function.clone());
        }

        let domain = decl
            .params
            .iter()
            .map(|param| value_sort(self.ctx, param))
            .collect::<Result<Vec<_>>>()?;
        let range = value_sort(self.ctx, &decl.return_type)?;
        let function = Rc::new(FuncDecl::new(
            self.ctx,
            decl.name.as_str(),
            &domain.iter().collect::<Vec<_>>(),
            &range,
        ));
        debug!(self.logger, "new function"; "name" => %decl.name, "type" => %decl.type_of());
        self.statistics.measure_interned_function();
        self.functions
            .insert(decl.name.clone(), (decl.clone(), function.clone()));
        Ok(function)
    }
}
