use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::environment::Environment;

/// Signature of a host function exposed to scripts.
pub type NativeFn = fn(&[Value]) -> Result<Value, String>;

/// A built‑in callable such as `clock`.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

/// A user function: a declaration paired with the environment it closed over.
pub struct Function {
    /// `None` for anonymous function literals.
    pub name: Option<String>,
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

// The closure may (indirectly) contain this very function, so only shallow
// fields are printed.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .finish()
    }
}

/// Runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    NativeFunction(Rc<NativeFunction>),
    Function(Rc<Function>),
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
}

impl Value {
    /// `nil` and `false` are falsy; everything else, `0` and `""` included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

/// Equality never coerces: values of different kinds are unequal, callables
/// compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Integral numbers print without a fractional part (`4.0` → `4`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name),

            Value::Function(function) => match &function.name {
                Some(name) => write!(f, "<fn {}>", name),
                None => write!(f, "<fn>"),
            },

            Value::Number(n) => write!(f, "{}", format_number(*n)),

            Value::String(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Nil => write!(f, "nil"),
        }
    }
}
