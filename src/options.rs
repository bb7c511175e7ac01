use slog::{o, Discard, Logger};
use sloggers::{
    file::FileLoggerBuilder,
    terminal::{Destination, TerminalLoggerBuilder},
    types::Severity,
    Build,
};
use z3::Config;

use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    /// Write logs to this file instead of the terminal.
    pub log_path: Option<&'a str>,
    pub discard_logs: bool,
    pub log_level: Severity,
    pub model_generation: bool,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            log_path: None,
            discard_logs: true,
            log_level: Severity::Info,
            model_generation: false,
        }
    }
}

impl<'a> Options<'a> {
    pub fn z3_config(&self) -> Config {
        let mut config = Config::new();
        config.set_model_generation(self.model_generation);
        config
    }

    /// Builds the root logger, `discard_logs` takes precedence over `log_path`.
    pub fn logger(&self) -> Result<Logger> {
        if self.discard_logs {
            return Ok(Logger::root(Discard, o!()));
        }
        let logger = if let Some(log_path) = self.log_path {
            let mut builder = FileLoggerBuilder::new(log_path);
            builder.level(self.log_level);
            builder.build()?
        } else {
            let mut builder = TerminalLoggerBuilder::new();
            builder.level(self.log_level);
            builder.destination(Destination::Stderr);
            builder.build()?
        };
        Ok(logger)
    }
}
