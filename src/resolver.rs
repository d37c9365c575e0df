//! Static resolver pass for the **slox** interpreter.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of `HashMap<String,bool>` tracking declared/defined).
//! 2. Report static errors (redeclaration, read in own initializer, top‑level `return`).
//! 3. Tell the interpreter, for *each* variable occurrence, how many scopes
//!    separate it from its declaration.  Names found in no scope are globals
//!    and get no entry, so the interpreter never falls back to a dynamic
//!    lookup that would see a later shadowing local.
//!
//! The first error aborts the pass; nothing is collected past it.

use crate::ast::{Expr, ExprId, FunctionDecl, Stmt};
use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::token::Token;
use log::{debug, info};
use std::collections::HashMap;

/// Are we inside a user function?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
}

/// Resolver: tracks scopes, enforces static rules, and *records* binding
/// distances by calling back into the interpreter.
pub struct Resolver<'interp> {
    interpreter: &'interp mut Interpreter,
    scopes: Vec<HashMap<String, bool>>, // false=declared, true=defined
    current_function: FunctionType,
}

impl<'interp> Resolver<'interp> {
    /// Create a new resolver bound to the given interpreter.
    pub fn new(interpreter: &'interp mut Interpreter) -> Self {
        info!("Resolver instantiated");
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
        }
    }

    /// Walk all top‑level statements.
    pub fn resolve(&mut self, statements: &[Stmt]) -> Result<()> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );
        for stmt in statements {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    /// Resolve a stand‑alone expression (evaluated at global scope).
    pub fn resolve_expression(&mut self, expr: &Expr) -> Result<()> {
        self.resolve_expr(expr)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                let result = statements.iter().try_for_each(|s| self.resolve_stmt(s));
                self.end_scope();
                result?;
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define, so `var a = a;` is caught
                self.declare(name)?;
                if let Some(expr) = initializer {
                    self.resolve_expr(expr)?;
                }
                self.define(name);
            }

            Stmt::Function { name, function } => {
                // the name is visible inside its own body (recursion)
                self.declare(name)?;
                self.define(name);
                self.resolve_function(function)?;
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr)?;
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition)?;
                self.resolve_stmt(then_branch)?;
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb)?;
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition)?;
                self.resolve_stmt(body)?;
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    return Err(LoxError::resolve(
                        keyword,
                        "Can't return from top-level code.",
                    ));
                }
                if let Some(expr) = value {
                    self.resolve_expr(expr)?;
                }
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => {
                self.resolve_expr(inner)?;
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right)?;
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left)?;
                self.resolve_expr(right)?;
            }

            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        return Err(LoxError::resolve(
                            name,
                            "Can't read local variable in its own initializer.",
                        ));
                    }
                }
                self.resolve_local(*id, name);
            }

            Expr::Assign { id, name, value } => {
                // First resolve RHS, then bind LHS
                self.resolve_expr(value)?;
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee)?;
                for arg in arguments {
                    self.resolve_expr(arg)?;
                }
            }

            Expr::Function(function) => {
                self.resolve_function(function)?;
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function’s parameters + body.
    fn resolve_function(&mut self, function: &FunctionDecl) -> Result<()> {
        let enclosing = self.current_function;
        self.current_function = FunctionType::Function;

        self.begin_scope();
        let result = self.resolve_params_and_body(function);
        self.end_scope();

        self.current_function = enclosing;
        result
    }

    fn resolve_params_and_body(&mut self, function: &FunctionDecl) -> Result<()> {
        for param in &function.params {
            self.declare(param)?;
            self.define(param);
        }
        for stmt in &function.body {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Globals are not tracked, so top‑level redeclaration is allowed.
    fn declare(&mut self, name: &Token) -> Result<()> {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                return Err(LoxError::resolve(
                    name,
                    "Already a variable with this name in this scope.",
                ));
            }
            scope.insert(name.lexeme.clone(), false);
        }
        Ok(())
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this variable occurrence as a local at depth `d`, or leave it
    /// unrecorded (global) if it is not found in *any* scope.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);
                self.interpreter.resolve(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }
}
