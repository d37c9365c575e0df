//! Tree‑walking evaluator.
//!
//! Statements run against a chain of [`Environment`]s.  Variable reads and
//! writes use the distances recorded by the [`Resolver`](crate::resolver::Resolver)
//! and fall back to the global scope for unresolved names.  `return` travels
//! up as [`Flow::Return`], never through the error channel.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::environment::{self, Environment};
use crate::error::{LoxError, Result, RuntimeError};
use crate::reporting::{ErrorReporter, NullReporter, OutputReporter};
use crate::token::{Token, TokenType};
use crate::value::{Function, NativeFunction, Value};

/// Convenient alias for evaluation results.
pub type IResult<T> = std::result::Result<T, RuntimeError>;

/// How a statement finished.
#[derive(Debug, Clone)]
pub enum Flow {
    Normal,
    /// A `return` unwinding to the nearest enclosing call.
    Return(Value),
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
    output: Box<dyn OutputReporter>,
    errors: Box<dyn ErrorReporter>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter whose output and diagnostics are discarded.
    pub fn new() -> Self {
        Self::with_reporters(NullReporter, NullReporter)
    }

    /// Creates an interpreter with a fresh global scope holding the natives.
    pub fn with_reporters<O, E>(output: O, errors: E) -> Self
    where
        O: OutputReporter + 'static,
        E: ErrorReporter + 'static,
    {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::NativeFunction(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: |_args: &[Value]| {
                    let millis: i64 = Utc::now().timestamp_millis();
                    Ok(Value::Number(millis as f64 / 1_000.0))
                },
            })),
        );

        Self {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
            output: Box::new(output),
            errors: Box::new(errors),
        }
    }

    /// Record the scope distance of a resolved variable reference.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        debug!("Noting {:?} at depth {}", id, depth);
        self.locals.insert(id, depth);
    }

    /// The scope statements currently execute in.
    pub fn environment(&self) -> Rc<RefCell<Environment>> {
        self.environment.clone()
    }

    /// Runs a program.  A runtime error stops the run, is reported through
    /// the error sink and returned.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => {}
                Ok(Flow::Return(_)) => {
                    // Only reachable for unresolved programs.
                    debug!("Top-level return ends the run");
                    break;
                }
                Err(e) => {
                    debug!("Runtime error: {}", e.message);
                    self.errors.report_runtime(&e);
                    return Err(LoxError::Runtime(e));
                }
            }
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Evaluates one expression and reports its value as a result.
    pub fn interpret_expression(&mut self, expr: &Expr) -> Result<Value> {
        match self.evaluate(expr) {
            Ok(value) => {
                self.output.report_result(&value);
                Ok(value)
            }
            Err(e) => {
                self.errors.report_runtime(&e);
                Err(LoxError::Runtime(e))
            }
        }
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> IResult<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;
                debug!("Printing value: {}", value);
                self.output.print(&value.to_string());
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(self.environment.clone());
                self.execute_block(statements, Rc::new(RefCell::new(scope)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function { name, function } => {
                debug!("Defining function '{}'", name.lexeme);
                let value = Value::Function(Rc::new(Function {
                    name: Some(name.lexeme.clone()),
                    declaration: function.clone(),
                    closure: self.environment.clone(),
                }));
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Ok(Flow::Return(value))
            }
        }
    }

    /// Runs `statements` inside `scope`, restoring the previous scope
    /// afterwards whether or not execution succeeded.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        scope: Rc<RefCell<Environment>>,
    ) -> IResult<Flow> {
        let previous = std::mem::replace(&mut self.environment, scope);

        let mut result: IResult<Flow> = Ok(Flow::Normal);
        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => {}
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> IResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_val: Value = self.evaluate(left)?;
                let short_circuit = if operator.token_type == TokenType::OR {
                    left_val.is_truthy()
                } else {
                    !left_val.is_truthy()
                };

                if short_circuit {
                    Ok(left_val)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        environment::assign_at(&self.environment, distance, name, value.clone())
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_val: Value = self.evaluate(callee)?;

                let mut arg_values: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    arg_values.push(self.evaluate(arg)?);
                }

                self.invoke_callable(&callee_val, paren, arg_values)
            }

            Expr::Function(declaration) => Ok(Value::Function(Rc::new(Function {
                name: None,
                declaration: declaration.clone(),
                closure: self.environment.clone(),
            }))),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> IResult<Value> {
        match self.locals.get(&id) {
            Some(&distance) => environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_unary(&mut self, op: &Token, expr: &Expr) -> IResult<Value> {
        let right_val: Value = self.evaluate(expr)?;

        match op.token_type {
            TokenType::MINUS => match right_val {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::new(op, "Operand must be a number.")),
            },
            TokenType::BANG => Ok(Value::Bool(!right_val.is_truthy())),
            _ => Err(RuntimeError::new(op, "Invalid unary operator.")),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> IResult<Value> {
        let left_val: Value = self.evaluate(left)?;
        let right_val: Value = self.evaluate(right)?;

        debug!(
            "Binary '{}' on {} and {}",
            op.lexeme, left_val, right_val
        );

        match op.token_type {
            TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left_val == right_val)),
            TokenType::BANG_EQUAL => return Ok(Value::Bool(left_val != right_val)),
            TokenType::PLUS => {
                return match (left_val, right_val) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                    _ => Err(RuntimeError::new(
                        op,
                        "Operands must be two numbers or two strings.",
                    )),
                };
            }
            _ => {}
        }

        let (a, b) = match (left_val, right_val) {
            (Value::Number(a), Value::Number(b)) => (a, b),
            _ => return Err(RuntimeError::new(op, "Operands must be numbers.")),
        };

        match op.token_type {
            TokenType::MINUS => Ok(Value::Number(a - b)),
            TokenType::STAR => Ok(Value::Number(a * b)),
            TokenType::SLASH => Ok(Value::Number(a / b)),
            TokenType::GREATER => Ok(Value::Bool(a > b)),
            TokenType::GREATER_EQUAL => Ok(Value::Bool(a >= b)),
            TokenType::LESS => Ok(Value::Bool(a < b)),
            TokenType::LESS_EQUAL => Ok(Value::Bool(a <= b)),
            _ => Err(RuntimeError::new(op, "Invalid binary operator.")),
        }
    }

    /// Invokes a callable (native or user-defined function).
    fn invoke_callable(
        &mut self,
        callee_val: &Value,
        paren: &Token,
        arg_values: Vec<Value>,
    ) -> IResult<Value> {
        let arity: usize = match callee_val {
            Value::NativeFunction(native) => native.arity,
            Value::Function(function) => function.arity(),
            _ => {
                return Err(RuntimeError::new(
                    paren,
                    "Can only call functions and classes.",
                ))
            }
        };

        if arg_values.len() != arity {
            return Err(RuntimeError::new(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    arity,
                    arg_values.len()
                ),
            ));
        }

        match callee_val {
            Value::NativeFunction(native) => {
                debug!("Calling native function '{}'", native.name);
                (native.func)(&arg_values).map_err(|msg| RuntimeError::new(paren, msg))
            }

            Value::Function(function) => {
                debug!("Calling {}", callee_val);

                let mut scope = Environment::with_enclosing(function.closure.clone());
                for (param, arg) in function.declaration.params.iter().zip(arg_values) {
                    scope.define(&param.lexeme, arg);
                }

                let flow: Flow =
                    self.execute_block(&function.declaration.body, Rc::new(RefCell::new(scope)))?;

                Ok(match flow {
                    Flow::Return(value) => value,
                    Flow::Normal => Value::Nil,
                })
            }

            _ => Err(RuntimeError::new(
                paren,
                "Can only call functions and classes.",
            )),
        }
    }
}
