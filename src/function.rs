use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::callable::Callable;
use crate::environment::{Environment, SharedEnv};
use crate::error::{LoxError, Result};
use crate::instance::Instance;
use crate::interpreter::{Flow, Interpreter};
use crate::token::Token;
use crate::value::Value;

/// A user‑defined function or method together with the environment it closes
/// over. Cloning shares the same function.
#[derive(Clone)]
pub struct Function(Rc<FunctionImpl>);

struct FunctionImpl {
    declaration: Rc<FunctionDecl>,
    closure: SharedEnv,
    is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: SharedEnv, is_initializer: bool) -> Self {
        Function(Rc::new(FunctionImpl {
            declaration,
            closure,
            is_initializer,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.declaration.name.lexeme
    }

    /// A copy of this method whose closure binds `this` to `instance`.
    pub fn bind(&self, instance: Instance) -> Function {
        let mut environment = Environment::with_enclosing(self.0.closure.clone());
        environment.define("this", Value::Instance(instance));

        Function::new(
            self.0.declaration.clone(),
            environment.into_shared(),
            self.0.is_initializer,
        )
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The receiver an initializer hands back, whatever its body did.
    fn bound_this(&self) -> Result<Value> {
        self.0
            .closure
            .borrow()
            .get_at(0, "this")
            .ok_or_else(|| LoxError::runtime(&self.0.declaration.name, "Undefined variable 'this'."))
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        self.0.declaration.params.len()
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        _paren: &Token,
    ) -> Result<Value> {
        let mut environment = Environment::with_enclosing(self.0.closure.clone());
        for (param, argument) in self.0.declaration.params.iter().zip(arguments) {
            environment.define(&param.lexeme, argument);
        }

        let flow = interpreter.execute_block(&self.0.declaration.body, environment.into_shared())?;

        if self.0.is_initializer {
            return self.bound_this();
        }

        Ok(match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        })
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .field("is_initializer", &self.0.is_initializer)
            .finish()
    }
}
