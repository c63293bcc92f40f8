//! One interpreter session: scan → parse → resolve → interpret.
//!
//! A [`Session`] owns a single [`Interpreter`], so globals defined by one
//! [`Session::run`] are visible to the next (the REPL relies on this).

use std::io::Write;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::ast::{Expr, Stmt};
use crate::diagnostics::Diagnostics;
use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::value::Value;

/// Why a run stopped early.
#[derive(Debug, Error)]
pub enum RunError {
    /// Every scan, parse or resolve error of the run, in report order.
    #[error("{} static error(s)", .0.len())]
    Static(Vec<LoxError>),

    /// The first runtime error; nothing after it executed.
    #[error(transparent)]
    Runtime(LoxError),
}

impl RunError {
    /// `65` for static errors, `70` for runtime errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Static(_) => 65,
            RunError::Runtime(e) => e.exit_code(),
        }
    }

    /// The individual errors, for reporting.
    pub fn errors(&self) -> Vec<&LoxError> {
        match self {
            RunError::Static(errors) => errors.iter().collect(),
            RunError::Runtime(e) => vec![e],
        }
    }
}

/// Read a source file, rejecting bytes that are not UTF-8.
pub fn read_source(path: &Path) -> crate::error::Result<String> {
    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes from {:?}", bytes.len(), path);

    Ok(String::from_utf8(bytes)?)
}

pub struct Session {
    interpreter: Interpreter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    pub fn with_writer<W: Write + 'static>(output: W) -> Self {
        Self {
            interpreter: Interpreter::with_writer(output),
        }
    }

    /// Run a whole program. Each static stage runs to completion; the next
    /// stage only starts if no error has been reported so far.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        let statements = self.compile(source)?;

        info!("Executing {} statements", statements.len());

        self.interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)
    }

    /// Scan, parse and resolve without executing anything.
    pub fn compile(&mut self, source: &str) -> Result<Vec<Stmt>, RunError> {
        let mut diagnostics = Diagnostics::new();

        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens, &mut diagnostics).parse();

        if diagnostics.has_errors() {
            debug!("Aborting after parse with {} error(s)", diagnostics.len());
            return Err(RunError::Static(diagnostics.into_errors()));
        }

        Resolver::new(&mut self.interpreter, &mut diagnostics).resolve(&statements);

        if diagnostics.has_errors() {
            debug!("Aborting after resolve with {} error(s)", diagnostics.len());
            return Err(RunError::Static(diagnostics.into_errors()));
        }

        Ok(statements)
    }

    /// Parse `source` as a single expression.
    pub fn parse_expression(&mut self, source: &str) -> Result<Expr, RunError> {
        let mut diagnostics = Diagnostics::new();

        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let expr = Parser::new(tokens, &mut diagnostics).parse_expression();

        match expr {
            Some(expr) if !diagnostics.has_errors() => Ok(expr),
            _ => Err(RunError::Static(diagnostics.into_errors())),
        }
    }

    /// Evaluate `source` as a single expression against the global scope.
    pub fn evaluate(&mut self, source: &str) -> Result<Value, RunError> {
        let expr = self.parse_expression(source)?;

        self.interpreter.evaluate(&expr).map_err(RunError::Runtime)
    }
}
