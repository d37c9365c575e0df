//! Centralised error hierarchy for the **slox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! The module **does not** print diagnostics itself; that is the job of an
//! [`ErrorReporter`](crate::reporting::ErrorReporter).

use std::io;
use thiserror::Error;

use log::info;

use crate::token::Token;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// A single syntactic (parser) error.  Already reported when created.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        /// ` at 'lexeme'` or ` at end`.
        location: String,
    },

    /// Summary of a scan or parse pass that reported at least one error.
    #[error("{errors} syntax error(s) reported")]
    Syntax { errors: usize },

    /// Static‑analysis failure (redeclaration, self‑initialiser, bad `return`).
    #[error("[line {}] Error at '{}': {}", .token.line, .token.lexeme, .message)]
    Resolve { token: Token, message: String },

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            line: token.line,
            location: token.location(),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        LoxError::Resolve {
            token: token.clone(),
            message,
        }
    }

    /// Conventional process exit code for this failure (sysexits style).
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Runtime(_) => 70,
            LoxError::Io(_) | LoxError::Utf8(_) => 74,
            _ => 65,
        }
    }
}

/// An error raised while evaluating, located at the offending token.
#[derive(Debug, Clone, Error)]
#[error("{}\n[line {}]", .message, .token.line)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", token.line, message);

        RuntimeError {
            token: token.clone(),
            message,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
