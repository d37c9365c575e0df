use std::fmt::Write as _;

use log::{debug, info};

use crate::ast::{Expr, Stmt};
use crate::ast_printer::AstPrinter;
use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporting::{ErrorReporter, OutputReporter};
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;
use crate::value::Value;

/// Runs source text through the whole pipeline against one long‑lived
/// interpreter, so globals persist between calls (one call per REPL line).
pub struct Lox {
    interpreter: Interpreter,
    errors: Box<dyn ErrorReporter>,
}

impl Lox {
    /// `errors` is cloned: one copy for the front end, one for the interpreter.
    pub fn new<O, E>(output: O, errors: E) -> Self
    where
        O: OutputReporter + 'static,
        E: ErrorReporter + Clone + 'static,
    {
        Self {
            interpreter: Interpreter::with_reporters(output, errors.clone()),
            errors: Box::new(errors),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Scan `source`, failing if any lexical error was reported.
    pub fn tokenize(&mut self, source: &str) -> Result<Vec<Token>> {
        let mut scanner = Scanner::new(source);
        let tokens: Vec<Token> = scanner.scan_tokens(self.errors.as_mut());

        match scanner.error_count() {
            0 => Ok(tokens),
            errors => Err(LoxError::Syntax { errors }),
        }
    }

    /// Scan and parse a program.  Lexical errors do not stop the parser from
    /// reporting its own, but either kind fails the result.
    pub fn parse_program(&mut self, source: &str) -> Result<Vec<Stmt>> {
        let mut scanner = Scanner::new(source);
        let tokens: Vec<Token> = scanner.scan_tokens(self.errors.as_mut());
        let lex_errors: usize = scanner.error_count();

        let parsed = Parser::new(tokens, self.errors.as_mut()).parse();

        match parsed {
            Ok(statements) if lex_errors == 0 => Ok(statements),
            Ok(_) => Err(LoxError::Syntax { errors: lex_errors }),
            Err(LoxError::Syntax { errors }) => Err(LoxError::Syntax {
                errors: errors + lex_errors,
            }),
            Err(e) => Err(e),
        }
    }

    /// Scan and parse a single expression.
    pub fn parse_expression(&mut self, source: &str) -> Result<Expr> {
        let mut scanner = Scanner::new(source);
        let tokens: Vec<Token> = scanner.scan_tokens(self.errors.as_mut());
        let lex_errors: usize = scanner.error_count();

        let parsed = Parser::new(tokens, self.errors.as_mut()).parse_expression();

        match parsed {
            Ok(expr) if lex_errors == 0 => Ok(expr),
            Ok(_) => Err(LoxError::Syntax { errors: lex_errors }),
            Err(LoxError::Syntax { errors }) => Err(LoxError::Syntax {
                errors: errors + lex_errors,
            }),
            Err(e) => Err(e),
        }
    }

    /// S‑expression rendering of every statement in `source`, one per line.
    pub fn parse_tree(&mut self, source: &str) -> Result<String> {
        let statements: Vec<Stmt> = self.parse_program(source)?;

        Ok(statements
            .iter()
            .map(AstPrinter::print_stmt)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Scan, parse, resolve and execute a program.
    pub fn run(&mut self, source: &str) -> Result<()> {
        info!("Running {} bytes of source", source.len());

        let statements: Vec<Stmt> = self.parse_program(source)?;

        debug!("Parsed {} statements", statements.len());

        self.report_resolution(|resolver| resolver.resolve(&statements))?;

        self.interpreter.interpret(&statements)
    }

    /// Evaluate one expression and report its value as a result.
    pub fn evaluate(&mut self, source: &str) -> Result<Value> {
        let expr: Expr = self.parse_expression(source)?;

        self.report_resolution(|resolver| resolver.resolve_expression(&expr))?;

        self.interpreter.interpret_expression(&expr)
    }

    fn report_resolution<F>(&mut self, pass: F) -> Result<()>
    where
        F: FnOnce(&mut Resolver<'_>) -> Result<()>,
    {
        let mut resolver = Resolver::new(&mut self.interpreter);

        if let Err(e) = pass(&mut resolver) {
            if let LoxError::Resolve { token, message } = &e {
                self.errors.report_at(token, message);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Listing of the innermost active scope: a header line, then
    /// `name : value` pairs sorted by name.
    pub fn environment_dump(&self) -> String {
        let env = self.interpreter.environment();
        let env = env.borrow();
        let names: Vec<String> = env.names();
        let width: usize = names.iter().map(|n| n.len()).max().unwrap_or(0);

        let mut out = format!(
            "Current environment (depth={}): variable count={}.",
            env.depth(),
            names.len()
        );

        for name in &names {
            let value: String = env
                .get_local(name)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "nil".to_string());
            let _ = write!(out, "\n{:<width$} : {}", name, value, width = width);
        }

        out
    }
}
