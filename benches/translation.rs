use criterion::{criterion_group, criterion_main, Criterion};
use slog::{o, Discard, Logger};
use symir::{dsl::*, BinOp, Expression, LogicalOp, MemoryKind, RuntimeType, Session};
use z3::{Config, Context};

/// A conjunction of `n` comparisons over chained sums.
fn sum_chain(n: usize) -> std::rc::Rc<Expression> {
    let mut sum = int_var("x0");
    let mut comparisons = Vec::new();
    for i in 1..n {
        sum = Expression::bin_op(BinOp::Plus, sum, int_var(format!("x{}", i))).unwrap();
        let bound = Expression::int(i as i64);
        comparisons.push(Expression::bin_op(BinOp::GreaterThan, sum.clone(), bound).unwrap());
    }
    Expression::logical_op(LogicalOp::And, comparisons).unwrap()
}

fn translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("translation");
    group.sample_size(10);

    let expression = sum_chain(50);
    group.bench_function("sum chain", |b| {
        b.iter(|| {
            let ctx = Context::new(&Config::new());
            let mut session = Session::with_logger(&ctx, Logger::root(Discard, o!()));
            session.translate(&expression).unwrap();
        })
    });

    group.bench_function("field writes", |b| {
        b.iter(|| {
            let ctx = Context::new(&Config::new());
            let mut session = Session::with_logger(&ctx, Logger::root(Discard, o!()));
            let node = session.memory.allocate(MemoryKind::Object, "Node");
            for i in 0..20 {
                session
                    .memory
                    .assign_field(&node, i % 4, Expression::int(i as i64))
                    .unwrap();
            }
            let read = session
                .memory
                .get_field(&node, 0, RuntimeType::IntRuntimeType)
                .unwrap();
            let check = Expression::bin_op(BinOp::Equal, read, Expression::int(16)).unwrap();
            session.is_valid(&check).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, translation);
criterion_main!(benches);
