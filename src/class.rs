use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::callable::Callable;
use crate::error::Result;
use crate::function::Function;
use crate::instance::Instance;
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

/// A class value. Calling it constructs an [`Instance`].
#[derive(Clone)]
pub struct Class(Rc<ClassImpl>);

struct ClassImpl {
    name: String,
    superclass: Option<Class>,
    methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(name: &str, superclass: Option<Class>, methods: HashMap<String, Function>) -> Self {
        Class(Rc::new(ClassImpl {
            name: name.to_string(),
            superclass,
            methods,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Look in this class, then up the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        match self.0.methods.get(name) {
            Some(method) => Some(method.clone()),
            None => self.0.superclass.as_ref()?.find_method(name),
        }
    }

    pub fn ptr_eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Callable for Class {
    /// Mirrors `init`, or 0 without one.
    fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        debug!("Instantiating class '{}'", self.name());

        let instance = Instance::new(self.clone());
        if let Some(initializer) = self.find_method("init") {
            initializer
                .bind(instance.clone())
                .call(interpreter, arguments, paren)?;
        }

        Ok(Value::Instance(instance))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.0.name)
            .field("superclass", &self.0.superclass.as_ref().map(Class::name))
            .field("methods", &self.0.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}
