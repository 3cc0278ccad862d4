//! A tree-walking interpreter for the Lox language.
//!
//! The pipeline is text → tokens → AST → resolved bindings → execution:
//! [`scanner::Scanner`] lexes, [`parser::Parser`] builds the AST with
//! panic-mode error recovery, [`resolver::Resolver`] computes lexical binding
//! distances and enforces static rules, and [`interpreter::Interpreter`]
//! evaluates.  [`Lox`] wires the stages together and hands every diagnostic
//! back to the caller, which decides exit behavior.

pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod token;
pub mod value;

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use log::info;

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// One interpreter session.  The embedded [`Interpreter`] persists across
/// [`Lox::run`] calls, so REPL lines share a global frame; a line that fails
/// statically defines nothing in that frame.
pub struct Lox {
    // The resolver persists too: its record of top-level declarations must
    // match the interpreter's global frame across lines.
    resolver: Resolver,
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Self {
            resolver: Resolver::new(),
            interpreter: Interpreter::new(),
        }
    }

    /// Session whose `print` output goes to `output` instead of stdout.
    pub fn with_output(output: Rc<RefCell<dyn Write>>) -> Self {
        Self {
            resolver: Resolver::new(),
            interpreter: Interpreter::with_output(output),
        }
    }

    /// Run one source unit (a whole file, or one REPL line) through the full
    /// pipeline.
    ///
    /// Any scan or parse error suppresses resolution; any static error
    /// suppresses execution.  All diagnostics from the failing stage are
    /// returned together.  A runtime error arrives alone, after any output
    /// the program produced before failing.
    pub fn run(&mut self, source: &str) -> Result<(), Vec<LoxError>> {
        info!("Running {} bytes of source", source.len());

        let (tokens, mut errors) = Scanner::new(source.as_bytes()).scan();

        let mut parser = Parser::new(&tokens);
        let (statements, parse_errors) = parser.parse();
        errors.extend(parse_errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        let (bindings, resolve_errors) = self.resolver.resolve(&statements);

        if !resolve_errors.is_empty() {
            return Err(resolve_errors);
        }

        self.interpreter.bind(bindings);
        self.interpreter.interpret(&statements).map_err(|e| vec![e])
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
