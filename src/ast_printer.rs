use crate::ast::{Expr, FunctionDecl, LiteralValue, Stmt};
use crate::value::format_number;

/// Converts syntax trees to a fully parenthesised prefix ("S‑expression")
/// form, e.g. `(* (- 123) (group 45.67))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(lit) => literal(lit),

            // ── grouping ────────────────────────────────────────────────
            Expr::Grouping(inner) => format!("(group {})", Self::print(inner)),

            // ── unary operator ──────────────────────────────────────────
            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::print(right))
            }

            // ── binary / logical operator ───────────────────────────────
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::print(left),
                Self::print(right)
            ),

            // ── names ───────────────────────────────────────────────────
            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                format!("(= {} {})", name.lexeme, Self::print(value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut s = format!("(call {}", Self::print(callee));
                for arg in arguments {
                    s.push(' ');
                    s.push_str(&Self::print(arg));
                }
                s.push(')');
                s
            }

            Expr::Function(function) => format!("(lambda {})", Self::function(function)),
        }
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", Self::print(expr)),

            Stmt::Print(expr) => format!("(print {})", Self::print(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, Self::print(init)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => {
                let mut s = String::from("(block");
                for inner in statements {
                    s.push(' ');
                    s.push_str(&Self::print_stmt(inner));
                }
                s.push(')');
                s
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch),
                    Self::print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch)
                ),
            },

            Stmt::While { condition, body } => format!(
                "(while {} {})",
                Self::print(condition),
                Self::print_stmt(body)
            ),

            Stmt::Function { name, function } => {
                format!("(fun {} {})", name.lexeme, Self::function(function))
            }

            Stmt::Return { value, .. } => match value {
                Some(expr) => format!("(return {})", Self::print(expr)),
                None => "(return)".to_string(),
            },
        }
    }

    /// `(params) body...` shared by named and anonymous functions.
    fn function(function: &FunctionDecl) -> String {
        let params: Vec<&str> = function.params.iter().map(|p| p.lexeme.as_str()).collect();
        let mut s = format!("({})", params.join(" "));
        for stmt in &function.body {
            s.push(' ');
            s.push_str(&Self::print_stmt(stmt));
        }
        s
    }
}

/// Converts expressions to postfix ("reverse Polish") form, e.g.
/// `1 2 + 4 3 - *`.  Statements have no postfix rendering.
pub struct RpnPrinter;

impl RpnPrinter {
    pub fn print(expr: &Expr) -> String {
        let mut parts: Vec<String> = Vec::new();
        Self::push(expr, &mut parts);
        parts.join(" ")
    }

    fn push(expr: &Expr, out: &mut Vec<String>) {
        match expr {
            Expr::Literal(lit) => out.push(literal(lit)),

            Expr::Grouping(inner) => {
                Self::push(inner, out);
                out.push("group".to_string());
            }

            Expr::Unary { operator, right } => {
                Self::push(right, out);
                out.push(operator.lexeme.clone());
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => {
                Self::push(left, out);
                Self::push(right, out);
                out.push(operator.lexeme.clone());
            }

            Expr::Variable { name, .. } => out.push(name.lexeme.clone()),

            Expr::Assign { name, value, .. } => {
                Self::push(value, out);
                out.push(format!(":= {}", name.lexeme));
            }

            // arguments first, then the callee as the operator
            Expr::Call {
                callee, arguments, ..
            } => {
                for arg in arguments {
                    Self::push(arg, out);
                }
                out.push(Self::print(callee).replace(' ', ""));
            }

            Expr::Function(function) => {
                let params: Vec<&str> =
                    function.params.iter().map(|p| p.lexeme.as_str()).collect();
                out.push(format!("(lambda ({}) <body>)", params.join(" ")));
            }
        }
    }
}

fn literal(lit: &LiteralValue) -> String {
    match lit {
        LiteralValue::Number(n) => format_number(*n),
        LiteralValue::Str(s) => s.clone(),
        LiteralValue::True => "true".into(),
        LiteralValue::False => "false".into(),
        LiteralValue::Nil => "nil".into(),
    }
}
