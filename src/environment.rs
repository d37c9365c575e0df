use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One lexical scope.  Scopes are shared (`Rc<RefCell<_>>`) because a closure
/// keeps its defining scope alive after the block that created it has exited.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn enclosing(&self) -> Option<Rc<RefCell<Environment>>> {
        self.enclosing.clone()
    }

    /// Bind `name` in this scope, replacing any binding it already has here.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up here, then in each enclosing scope.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Number of enclosing links above this scope (globals are depth 0).
    pub fn depth(&self) -> usize {
        match &self.enclosing {
            Some(enclosing) => 1 + enclosing.borrow().depth(),
            None => 0,
        }
    }

    /// Names bound directly in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }

    /// Value bound directly in this scope, without walking outward.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

/// The scope exactly `distance` links above `env`.
///
/// The resolver guarantees the chain is at least that long.
pub fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
    let mut current: Rc<RefCell<Environment>> = env.clone();

    for _ in 0..distance {
        let next = current.borrow().enclosing();
        match next {
            Some(parent) => current = parent,
            None => break,
        }
    }

    current
}

/// Read `name` from the scope `distance` links above `env`.
pub fn get_at(
    env: &Rc<RefCell<Environment>>,
    distance: usize,
    name: &Token,
) -> Result<Value, RuntimeError> {
    ancestor(env, distance)
        .borrow()
        .get_local(&name.lexeme)
        .ok_or_else(|| undefined(name))
}

/// Write `name` in the scope `distance` links above `env`.
pub fn assign_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token, value: Value) {
    ancestor(env, distance)
        .borrow_mut()
        .define(&name.lexeme, value);
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().define("a", Value::Number(1.0));

        let inner = Rc::new(RefCell::new(Environment::with_enclosing(outer.clone())));
        inner.borrow_mut().define("a", Value::Number(2.0));

        assert_eq!(inner.borrow().get(&ident("a")).unwrap(), Value::Number(2.0));
        assert_eq!(outer.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_mutates_nearest_definition() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().define("a", Value::Nil);
        let inner = Rc::new(RefCell::new(Environment::with_enclosing(outer.clone())));

        inner
            .borrow_mut()
            .assign(&ident("a"), Value::Bool(true))
            .unwrap();

        assert_eq!(outer.borrow().get_local("a"), Some(Value::Bool(true)));
        assert_eq!(inner.borrow().get_local("a"), None);
    }

    #[test]
    fn assign_to_undeclared_is_an_error() {
        let mut env = Environment::new();
        let err = env.assign(&ident("ghost"), Value::Nil).unwrap_err();

        assert_eq!(err.message, "Undefined variable 'ghost'.");
    }

    #[test]
    fn distance_addressing_skips_shadowing_scopes() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("x", Value::Number(1.0));
        let middle = Rc::new(RefCell::new(Environment::with_enclosing(global.clone())));
        middle.borrow_mut().define("x", Value::Number(2.0));
        let inner = Rc::new(RefCell::new(Environment::with_enclosing(middle.clone())));

        assert_eq!(get_at(&inner, 2, &ident("x")).unwrap(), Value::Number(1.0));
        assert_eq!(get_at(&inner, 1, &ident("x")).unwrap(), Value::Number(2.0));

        assign_at(&inner, 2, &ident("x"), Value::Number(3.0));
        assert_eq!(global.borrow().get_local("x"), Some(Value::Number(3.0)));
        assert_eq!(inner.borrow().depth(), 2);
    }
}
