use std::fmt::Display;

use itertools::Itertools;
use pretty::{BoxAllocator, DocAllocator, DocBuilder, Pretty};

use crate::syntax::*;

const WIDTH: usize = 120;

impl<'a, D: DocAllocator<'a>> Pretty<'a, D> for &Expression {
    fn pretty(self, allocator: &'a D) -> DocBuilder<'a, D, ()> {
        match self {
            Expression::SymbolicVar { var, .. } => allocator.text(var.to_string()),
            Expression::Lit { lit, .. } => match lit {
                Lit::BoolLit { bool_value } => allocator.text(bool_value.to_string()),
                Lit::IntLit { int_value } => allocator.text(int_value.to_string()),
            },
            Expression::Ref { ref_, .. } => allocator
                .text("ref")
                .append(allocator.text(ref_.to_string()).parens()),
            Expression::BinOp {
                bin_op: BinOp::Select,
                lhs,
                rhs,
                ..
            } => lhs.pretty(allocator).append(rhs.pretty(allocator).brackets()),
            Expression::BinOp {
                bin_op, lhs, rhs, ..
            } => lhs
                .pretty(allocator)
                .append(allocator.space())
                .append(bin_op_to_str(bin_op))
                .append(allocator.space())
                .append(rhs.pretty(allocator))
                .parens(),
            Expression::LogicalOp {
                logical_op: LogicalOp::Not,
                operands,
                ..
            } => allocator
                .text("!")
                .append(separated(allocator, operands, "")),
            Expression::LogicalOp {
                logical_op,
                operands,
                ..
            } => {
                let separator = format!(" {} ", logical_op_to_str(logical_op));
                separated(allocator, operands, &separator).parens()
            }
            Expression::UnOp { un_op, value, .. } => {
                let un_op_str = match un_op {
                    UnOp::Negative => "-",
                    UnOp::Negate => "!",
                };
                allocator.text(un_op_str).append(value.pretty(allocator))
            }
            Expression::Conditional {
                guard,
                true_,
                false_,
                ..
            } => allocator
                .text("if ")
                .append(guard.pretty(allocator))
                .append(" then ")
                .append(true_.pretty(allocator))
                .append(" else ")
                .append(false_.pretty(allocator))
                .parens(),
            Expression::FunctionDecl { decl, .. } => allocator
                .text("fn ")
                .append(decl.name.to_string())
                .append(
                    allocator
                        .text(decl.params.iter().map(ToString::to_string).join(", "))
                        .parens(),
                )
                .append(" -> ")
                .append(decl.return_type.to_string()),
            Expression::FunctionCall {
                decl, arguments, ..
            } => allocator
                .text(decl.name.to_string())
                .append(separated(allocator, arguments, ", ").parens()),
            Expression::FieldAssign {
                object,
                field,
                value,
                struct_tag,
                ..
            } => object.pretty(allocator).append(
                allocator
                    .text(format!("{}.{} := ", struct_tag, field))
                    .append(value.pretty(allocator))
                    .brackets(),
            ),
            Expression::FieldAccess {
                object,
                field,
                struct_tag,
                ..
            } => object
                .pretty(allocator)
                .append(format!(".{}.{}", struct_tag, field)),
        }
    }
}

fn separated<'a, D: DocAllocator<'a>>(
    allocator: &'a D,
    expressions: &[std::rc::Rc<Expression>],
    separator: &str,
) -> DocBuilder<'a, D, ()> {
    let mut doc = allocator.nil();
    for (i, expression) in expressions.iter().enumerate() {
        if i > 0 {
            doc = doc.append(separator.to_owned());
        }
        doc = doc.append(expression.pretty(allocator));
    }
    doc
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let allocator = BoxAllocator;
        let doc: DocBuilder<BoxAllocator, ()> = self.pretty(&allocator);
        let doc = doc.into_doc();
        write!(f, "{}", pretty::Doc::pretty(&doc, WIDTH))
    }
}

fn bin_op_to_str(bin_op: &BinOp) -> &'static str {
    match bin_op {
        BinOp::Plus => "+",
        BinOp::Minus => "-",
        BinOp::Multiply => "*",
        BinOp::Divide => "/",
        BinOp::Modulo => "%",
        BinOp::Equal => "==",
        BinOp::NotEqual => "!=",
        BinOp::LessThan => "<",
        BinOp::LessThanEqual => "<=",
        BinOp::GreaterThan => ">",
        BinOp::GreaterThanEqual => ">=",
        BinOp::Select => "@",
    }
}

fn logical_op_to_str(logical_op: &LogicalOp) -> &'static str {
    match logical_op {
        LogicalOp::And => "&&",
        LogicalOp::Or => "||",
        LogicalOp::Not => "!",
        LogicalOp::Implies => "==>",
    }
}

#[cfg(test)]
mod tests {
    use crate::{dsl::*, syntax::*};

    #[test]
    fn binary_and_logical() {
        let sum = Expression::bin_op(BinOp::Plus, int_var("x"), int_var("y")).unwrap();
        let condition = Expression::bin_op(BinOp::GreaterThan, sum, Expression::int(5)).unwrap();
        assert_eq!(condition.to_string(), "((x + y) > 5)");

        let and = Expression::logical_op(
            LogicalOp::And,
            vec![bool_var("a"), bool_var("b"), bool_var("c")],
        )
        .unwrap();
        assert_eq!(and.to_string(), "(a && b && c)");

        let not = Expression::logical_op(LogicalOp::Not, vec![bool_var("a")]).unwrap();
        assert_eq!(not.to_string(), "!a");
    }

    #[test]
    fn select_conditional_and_calls() {
        let arr = array_var("arr", RuntimeType::IntRuntimeType);
        let elem = Expression::bin_op(BinOp::Select, arr, Expression::int(0)).unwrap();
        assert_eq!(elem.to_string(), "arr[0]");

        let cond = Expression::bin_op(BinOp::GreaterThan, int_var("a"), int_var("b")).unwrap();
        let max = Expression::conditional(cond, int_var("a"), int_var("b")).unwrap();
        assert_eq!(max.to_string(), "(if (a > b) then a else b)");

        let decl = Expression::function_decl(
            "max",
            vec![RuntimeType::IntRuntimeType, RuntimeType::IntRuntimeType],
            RuntimeType::IntRuntimeType,
        )
        .unwrap();
        assert_eq!(decl.to_string(), "fn max(int, int) -> int");
        let call = Expression::function_call(&decl, vec![int_var("x"), int_var("y")]).unwrap();
        assert_eq!(call.to_string(), "max(x, y)");
    }

    #[test]
    fn field_operations() {
        let assign =
            Expression::field_assign(Expression::reference(1), 0, Expression::int(30), "Person")
                .unwrap();
        assert_eq!(assign.to_string(), "ref(1)[Person.0 := 30]");
        let access = Expression::field_access(
            assign.clone(),
            0,
            Some(Expression::reference(1)),
            "Person",
            RuntimeType::IntRuntimeType,
        )
        .unwrap();
        assert_eq!(access.to_string(), "ref(1)[Person.0 := 30].Person.0");
    }
}
