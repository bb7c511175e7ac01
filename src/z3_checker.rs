use std::{convert::TryFrom, rc::Rc};

use slog::debug;
use z3::{ast::Bool, SatResult, Solver};

use crate::{
    error::{unification_error, Result},
    syntax::{Expression, RuntimeType},
    translator::Translator,
    typeable::Typeable,
};

/// Checks satisfiability of the conjunction of `assertions` on a fresh solver.
///
/// Every assertion must be Bool-typed. The terms are interned in `translator`, so assertions
/// from earlier calls share their variables with these.
pub fn verify(translator: &mut Translator, assertions: &[Rc<Expression>]) -> Result<SatResult> {
    let solver = Solver::new(translator.get_ctx());
    for assertion in assertions {
        let term = translate_bool(translator, assertion)?;
        solver.assert(&term);
    }

    translator.measure_invoke_z3();
    let result = solver.check();
    debug!(translator.logger(), "z3 check"; "assertions" => assertions.len(), "result" => ?result);
    Ok(result)
}

/// True when `expression` holds for every assignment of its symbolic inputs.
pub fn is_valid(translator: &mut Translator, expression: &Expression) -> Result<bool> {
    let solver = Solver::new(translator.get_ctx());
    let term = translate_bool(translator, expression)?;
    solver.assert(&term.not());

    translator.measure_invoke_z3();
    let result = solver.check();
    debug!(translator.logger(), "z3 validity check"; "result" => ?result);
    Ok(result == SatResult::Unsat)
}

fn translate_bool<'ctx>(
    translator: &mut Translator<'ctx>,
    expression: &Expression,
) -> Result<Bool<'ctx>> {
    let type_ = expression.type_of();
    if type_ != RuntimeType::BoolRuntimeType {
        return Err(unification_error(RuntimeType::BoolRuntimeType, type_));
    }
    Bool::try_from(translator.translate(expression)?)
}

#[cfg(test)]
mod tests {
    use slog::{o, Discard, Logger};
    use z3::{Config, Context};

    use super::*;
    use crate::{dsl::*, error::Error, syntax::BinOp};

    #[test]
    fn validity() {
        let ctx = Context::new(&Config::new());
        let mut translator = Translator::new(&ctx, Logger::root(Discard, o!()));

        let reflexive = Expression::bin_op(BinOp::Equal, int_var("x"), int_var("x")).unwrap();
        assert!(is_valid(&mut translator, &reflexive).unwrap());

        let positive = Expression::bin_op(BinOp::GreaterThan, int_var("x"), Expression::int(0))
            .unwrap();
        assert!(!is_valid(&mut translator, &positive).unwrap());
        assert_eq!(
            verify(&mut translator, &[positive]).unwrap(),
            SatResult::Sat
        );
        assert_eq!(translator.statistics().number_of_z3_invocations, 3);
    }

    #[test]
    fn assertions_must_be_bool() {
        let ctx = Context::new(&Config::new());
        let mut translator = Translator::new(&ctx, Logger::root(Discard, o!()));
        let err = verify(&mut translator, &[int_var("x")]);
        assert!(matches!(err, Err(Error::Unification { .. })));
    }
}
