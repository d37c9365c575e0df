//! Error and output sinks.
//!
//! The core never writes to a terminal itself.  Diagnostics go to an
//! [`ErrorReporter`], `print` output and top‑level results go to an
//! [`OutputReporter`].  Hosts pick an implementation: [`ConsoleReporter`] for
//! the CLI, [`MemoryReporter`] for tests and embedding, [`NullReporter`] to
//! discard everything.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// Receives diagnostics from every phase.
pub trait ErrorReporter {
    /// A located message without a token (scanner errors).
    fn report(&mut self, line: usize, message: &str);

    /// A message anchored at a token (parser and resolver errors).
    fn report_at(&mut self, token: &Token, message: &str) {
        self.report(token.line, &format!("at{}: {}", token.location(), message));
    }

    fn report_runtime(&mut self, error: &RuntimeError) {
        self.report(error.token.line, &error.message);
    }
}

/// Receives the program's visible output.
pub trait OutputReporter {
    /// One line written by a `print` statement.
    fn print(&mut self, line: &str);

    /// The value of a bare expression evaluated for display.
    fn report_result(&mut self, value: &Value);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report(&mut self, _line: usize, _message: &str) {}
}

impl OutputReporter for NullReporter {
    fn print(&mut self, _line: &str) {}

    fn report_result(&mut self, _value: &Value) {}
}

/// Writes output to stdout and diagnostics to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ErrorReporter for ConsoleReporter {
    fn report(&mut self, line: usize, message: &str) {
        eprintln!("[line {}] Error: {}", line, message);
    }

    fn report_at(&mut self, token: &Token, message: &str) {
        eprintln!("[line {}] Error{}: {}", token.line, token.location(), message);
    }

    fn report_runtime(&mut self, error: &RuntimeError) {
        eprintln!("{}", error);
    }
}

impl OutputReporter for ConsoleReporter {
    fn print(&mut self, line: &str) {
        println!("{}", line);
    }

    fn report_result(&mut self, value: &Value) {
        // Quote strings so `"x"` is distinguishable from a variable named x.
        match value {
            Value::String(s) => println!("\"{}\"", s),
            other => println!("{}", other),
        }
    }
}

/// Everything a [`MemoryReporter`] has captured.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Captured {
    pub prints: Vec<String>,
    pub results: Vec<String>,
    pub errors: Vec<String>,
}

/// In‑memory sink.  Clones share one buffer, so a host can hand one clone to
/// the interpreter and inspect the other afterwards.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    inner: Rc<RefCell<Captured>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prints(&self) -> Vec<String> {
        self.inner.borrow().prints.clone()
    }

    pub fn results(&self) -> Vec<String> {
        self.inner.borrow().results.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner.borrow().errors.clone()
    }

    pub fn snapshot(&self) -> Captured {
        self.inner.borrow().clone()
    }

    pub fn clear(&self) {
        *self.inner.borrow_mut() = Captured::default();
    }
}

impl ErrorReporter for MemoryReporter {
    fn report(&mut self, line: usize, message: &str) {
        let entry: String = format!("[line {}] Error: {}", line, message);

        debug!("Captured error: {}", entry);

        self.inner.borrow_mut().errors.push(entry);
    }

    fn report_at(&mut self, token: &Token, message: &str) {
        let entry: String = format!("[line {}] Error{}: {}", token.line, token.location(), message);

        debug!("Captured error: {}", entry);

        self.inner.borrow_mut().errors.push(entry);
    }

    fn report_runtime(&mut self, error: &RuntimeError) {
        self.inner.borrow_mut().errors.push(error.to_string());
    }
}

impl OutputReporter for MemoryReporter {
    fn print(&mut self, line: &str) {
        self.inner.borrow_mut().prints.push(line.to_string());
    }

    fn report_result(&mut self, value: &Value) {
        self.inner.borrow_mut().results.push(value.to_string());
    }
}
