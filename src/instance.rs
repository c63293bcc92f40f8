use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::class::Class;
use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

/// An object created by calling a [`Class`]. Clones share the same fields.
#[derive(Clone)]
pub struct Instance(Rc<RefCell<InstanceImpl>>);

struct InstanceImpl {
    class: Class,
    fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Class) -> Self {
        Instance(Rc::new(RefCell::new(InstanceImpl {
            class,
            fields: HashMap::new(),
        })))
    }

    pub fn class(&self) -> Class {
        self.0.borrow().class.clone()
    }

    /// Fields shadow methods; a method comes back bound to this instance.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.0.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match self.class().find_method(&name.lexeme) {
            Some(method) => Ok(Value::Function(method.bind(self.clone()))),
            None => Err(LoxError::runtime(
                name,
                format!("Undefined property '{}'.", name.lexeme),
            )),
        }
    }

    /// Always writes a field, never a method.
    pub fn set(&self, name: &Token, value: Value) {
        self.0
            .borrow_mut()
            .fields
            .insert(name.lexeme.clone(), value);
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Instance")
            .field("class", &inner.class.name())
            .field("fields", &inner.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
