use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// An environment shared between the interpreter, blocks and closures.
pub type SharedEnv = Rc<RefCell<Environment>>;

/// One scope of variable bindings plus a link to its enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<SharedEnv>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: SharedEnv) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap in the shared handle used everywhere else.
    pub fn into_shared(self) -> SharedEnv {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this scope only. Rebinding an existing name overwrites it.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}'", name);

        self.values.insert(name.to_string(), value);
    }

    /// Names bound directly in this scope.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Look `name` up here, then along the enclosing chain.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Read `name` exactly `distance` links up the chain, without falling
    /// back to any other scope.
    pub fn get_at(&self, distance: usize, name: &str) -> Option<Value> {
        if distance == 0 {
            self.values.get(name).cloned()
        } else {
            self.enclosing
                .as_ref()?
                .borrow()
                .get_at(distance - 1, name)
        }
    }

    /// Write `name` exactly `distance` links up the chain. Returns `false` if
    /// that scope has no such binding.
    pub fn assign_at(&mut self, distance: usize, name: &str, value: Value) -> bool {
        if distance == 0 {
            match self.values.get_mut(name) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            }
        } else {
            match &self.enclosing {
                Some(enclosing) => enclosing.borrow_mut().assign_at(distance - 1, name, value),
                None => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, None, 1)
    }

    #[test]
    fn lookup_walks_the_chain() {
        let globals = Environment::new().into_shared();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(globals.clone());
        assert_eq!(inner.get(&ident("a")).ok(), Some(Value::Number(1.0)));

        let err = inner.get(&ident("missing")).unwrap_err();
        assert_eq!(err.to_string(), "Undefined variable 'missing'.\n[line 1]");
    }

    #[test]
    fn assign_updates_enclosing_binding() {
        let globals = Environment::new().into_shared();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let mut inner = Environment::with_enclosing(globals.clone());
        inner.assign(&ident("a"), Value::Bool(true)).unwrap();

        assert_eq!(globals.borrow().get_at(0, "a"), Some(Value::Bool(true)));
        assert!(inner.assign(&ident("b"), Value::Nil).is_err());
    }

    #[test]
    fn distance_access_ignores_shadowing() {
        let outer = Environment::new().into_shared();
        outer.borrow_mut().define("x", Value::Number(1.0));

        let inner = Environment::with_enclosing(outer.clone()).into_shared();
        inner.borrow_mut().define("x", Value::Number(2.0));

        assert_eq!(inner.borrow().get_at(1, "x"), Some(Value::Number(1.0)));
        assert_eq!(inner.borrow().get_at(0, "x"), Some(Value::Number(2.0)));
        assert_eq!(inner.borrow().get_at(2, "x"), None);

        assert!(inner.borrow_mut().assign_at(1, "x", Value::Nil));
        assert_eq!(outer.borrow().get_at(0, "x"), Some(Value::Nil));
        assert!(!inner.borrow_mut().assign_at(0, "y", Value::Nil));
    }

    #[test]
    fn redefining_overwrites() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::Number(2.0));
        assert_eq!(env.get_at(0, "x"), Some(Value::Number(2.0)));
    }
}
