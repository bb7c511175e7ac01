use std::rc::Rc;

use slog::{info, o, Logger};
use z3::{Context, SatResult};

use crate::{
    error::Result,
    heap::Memory,
    options::Options,
    syntax::Expression,
    translator::{AstNode, Translator},
    z3_checker,
};

/// One analysis: a heap and a translator over a single Z3 context.
///
/// Neither part is `Send`, parallel analyses each own a session.
pub struct Session<'ctx> {
    pub memory: Memory,
    pub translator: Translator<'ctx>,
    logger: Logger,
}

impl<'ctx> Session<'ctx> {
    pub fn new(ctx: &'ctx Context, options: &Options) -> Result<Session<'ctx>> {
        let logger = options.logger()?;
        Ok(Session::with_logger(ctx, logger))
    }

    pub fn with_logger(ctx: &'ctx Context, logger: Logger) -> Session<'ctx> {
        info!(logger, "new session");
        Session {
            memory: Memory::new(logger.new(o!("component" => "memory"))),
            translator: Translator::new(ctx, logger.new(o!("component" => "translator"))),
            logger,
        }
    }

    pub fn translate(&mut self, expression: &Expression) -> Result<AstNode<'ctx>> {
        self.translator.translate(expression)
    }

    pub fn verify(&mut self, assertions: &[Rc<Expression>]) -> Result<SatResult> {
        z3_checker::verify(&mut self.translator, assertions)
    }

    pub fn is_valid(&mut self, expression: &Expression) -> Result<bool> {
        z3_checker::is_valid(&mut self.translator, expression)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}
