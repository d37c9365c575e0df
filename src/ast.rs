//! Syntax tree produced by the [`Parser`](crate::parser::Parser).
//!
//! Nodes are built once and never mutated afterwards.  The resolver annotates
//! `Variable` and `Assign` nodes through a side table keyed on their
//! [`ExprId`], so the tree itself carries no binding information.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::token::Token;

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

/// Stable identity of a resolvable expression node.
///
/// Ids come from one process‑wide counter, so trees parsed at different times
/// (one per REPL line) never collide inside a long‑lived interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

impl ExprId {
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A **literal constant** that appears directly in the source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric literal, stored as IEEE‑754 `f64`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    True,

    False,

    Nil,
}

/// Parameters and body shared by named function declarations and anonymous
/// function literals.  Held behind an `Rc` so every closure created from it
/// points at the same node.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Parameter name tokens (arity ≤ 255).
    pub params: Vec<Token>,

    pub body: Vec<Stmt>,
}

/// Every kind of *expression* in slox.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralValue),

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr>),

    /// Prefix `!` or `-`.
    Unary { operator: Token, right: Box<Expr> },

    /// Infix arithmetic, comparison and equality operators.
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Short‑circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Variable { id: ExprId, name: Token },

    /// `identifier "=" expression`
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        /// The closing `)`, retained for error locations.
        paren: Token,
        arguments: Vec<Expr>,
    },

    /// Anonymous `fun (params) { body }`.
    Function(Rc<FunctionDecl>),
}

/// *Statements*: a program is a sequence of these nodes returned by
/// [`Parser::parse`](crate::parser::Parser::parse).
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),

    Print(Expr),

    /// `"var" IDENT ("=" initializer)? ";"`
    Var {
        name: Token,
        initializer: Option<Expr>,
    },

    Block(Vec<Stmt>),

    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// `while` loop; `for` loops are desugared into this.
    While { condition: Expr, body: Box<Stmt> },

    Function {
        name: Token,
        function: Rc<FunctionDecl>,
    },

    Return {
        /// The `return` keyword token.
        keyword: Token,
        /// Absent ⇒ `nil` is returned.
        value: Option<Expr>,
    },
}

impl Expr {
    pub fn variable(name: Token) -> Self {
        Expr::Variable {
            id: ExprId::fresh(),
            name,
        }
    }

    pub fn assign(name: Token, value: Expr) -> Self {
        Expr::Assign {
            id: ExprId::fresh(),
            name,
            value: Box::new(value),
        }
    }
}
