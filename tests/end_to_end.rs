use std::rc::Rc;

use slog::{o, Discard, Logger};
use symir::{
    dsl::*, BinOp, Expression, LogicalOp, Options, RuntimeType, Session, Translator,
};
use z3::{Config, Context, SatResult};

fn equals(lhs: Rc<Expression>, rhs: Rc<Expression>) -> Rc<Expression> {
    Expression::bin_op(BinOp::Equal, lhs, rhs).unwrap()
}

#[test]
fn sum_greater_than_five() {
    let ctx = Context::new(&Config::new());
    let mut session = Session::new(&ctx, &Options::default()).unwrap();

    let sum = Expression::bin_op(BinOp::Plus, int_var("x"), int_var("y")).unwrap();
    let condition = Expression::bin_op(BinOp::GreaterThan, sum, Expression::int(5)).unwrap();
    assert_eq!(condition.to_string(), "((x + y) > 5)");

    let too_small = session
        .verify(&[
            condition.clone(),
            equals(int_var("x"), Expression::int(3)),
            equals(int_var("y"), Expression::int(1)),
        ])
        .unwrap();
    assert_eq!(too_small, SatResult::Unsat);

    let large_enough = session
        .verify(&[
            condition,
            equals(int_var("x"), Expression::int(3)),
            equals(int_var("y"), Expression::int(3)),
        ])
        .unwrap();
    assert_eq!(large_enough, SatResult::Sat);
}

#[test]
fn interning_is_per_session() {
    let ctx = Context::new(&Config::new());
    let mut session = Session::with_logger(&ctx, Logger::root(Discard, o!()));
    let first = session.translate(&int_var("x")).unwrap();
    let second = session.translate(&int_var("x")).unwrap();
    assert_eq!(first, second);

    let other_ctx = Context::new(&Config::new());
    let mut other = Translator::new(&other_ctx, Logger::root(Discard, o!()));
    let third = other.translate(&int_var("x")).unwrap();
    assert_ne!(first, third);
    assert!(!std::ptr::eq(
        first.get_ctx().unwrap(),
        third.get_ctx().unwrap()
    ));
}

#[test]
fn uninterpreted_functions_are_congruent() {
    let ctx = Context::new(&Config::new());
    let mut session = Session::with_logger(&ctx, Logger::root(Discard, o!()));
    let f = Expression::function_decl(
        "f",
        vec![RuntimeType::IntRuntimeType],
        RuntimeType::IntRuntimeType,
    )
    .unwrap();
    let fx = Expression::function_call(&f, vec![int_var("x")]).unwrap();
    let fy = Expression::function_call(&f, vec![int_var("y")]).unwrap();

    let congruence = Expression::logical_op(
        LogicalOp::Implies,
        vec![equals(int_var("x"), int_var("y")), equals(fx.clone(), fy)],
    )
    .unwrap();
    assert!(session.is_valid(&congruence).unwrap());

    // nothing forces f to be the identity
    let identity = equals(fx, int_var("x"));
    assert!(!session.is_valid(&identity).unwrap());
}

#[test]
fn arrays_of_arrays() {
    let ctx = Context::new(&Config::new());
    let mut session = Session::with_logger(&ctx, Logger::root(Discard, o!()));
    let matrix = array_var("m", RuntimeType::array_of(RuntimeType::BoolRuntimeType));
    let row = Expression::bin_op(BinOp::Select, matrix, int_var("i")).unwrap();
    let cell = Expression::bin_op(BinOp::Select, row, Expression::int(2)).unwrap();
    assert_eq!(cell.to_string(), "m[i][2]");

    let negated = Expression::un_op(symir::UnOp::Negate, cell.clone()).unwrap();
    let contradiction = Expression::logical_op(LogicalOp::And, vec![cell, negated]).unwrap();
    assert_eq!(session.verify(&[contradiction]).unwrap(), SatResult::Unsat);
}
