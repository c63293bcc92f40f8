//! Tree‑walking evaluator.
//!
//! Statements return a [`Flow`] so that `return` travels up through blocks
//! and loops as an ordinary value; only genuine failures use `Err`. The first
//! runtime error ends the run.

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, Stmt};
use crate::callable::NativeFunction;
use crate::class::Class;
use crate::environment::{Environment, SharedEnv};
use crate::error::{LoxError, Result};
use crate::function::Function;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: SharedEnv,
    environment: SharedEnv,
    locals: HashMap<ExprId, usize>,
    output: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter printing to stdout, with `clock` predefined.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Creates an interpreter whose `print` output goes to `output`.
    pub fn with_writer<W: Write + 'static>(output: W) -> Self {
        info!("Initializing Interpreter");

        let globals: SharedEnv = Environment::new().into_shared();

        debug!("Defining native function 'clock'");
        globals
            .borrow_mut()
            .define("clock", Value::NativeFunction(NativeFunction::clock()));

        Self {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
            output: Box::new(output),
        }
    }

    /// Record that the reference `id` resolves `depth` scopes up.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        debug!("Noting local {} at depth {}", id, depth);

        self.locals.insert(id, depth);
    }

    /// Names currently bound in the global scope.
    pub fn global_names(&self) -> Vec<String> {
        self.globals.borrow().names().map(str::to_string).collect()
    }

    /// Runs a program, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        let result = statements
            .iter()
            .try_for_each(|stmt| self.execute(stmt).map(|_| ()));

        // Output printed before a runtime error still reaches the writer.
        self.output.flush()?;
        result?;

        info!("Interpretation completed successfully");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value)?;
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let environment = Environment::with_enclosing(self.environment.clone());
                self.execute_block(statements, environment.into_shared())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
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

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);
                let function = Function::new(declaration.clone(), self.environment.clone(), false);
                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(function));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                debug!("Defining class '{}'", name.lexeme);

                let superclass: Option<Class> = match superclass {
                    Some(expr) => match self.evaluate(expr)? {
                        Value::Class(class) => Some(class),
                        _ => {
                            let token = match expr {
                                Expr::Variable { name, .. } => name,
                                _ => name,
                            };
                            return Err(LoxError::runtime(token, "Superclass must be a class."));
                        }
                    },
                    None => None,
                };

                self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

                // Methods of a subclass close over a scope holding `super`.
                let method_env: SharedEnv = match &superclass {
                    Some(class) => {
                        let mut env = Environment::with_enclosing(self.environment.clone());
                        env.define("super", Value::Class(class.clone()));
                        env.into_shared()
                    }
                    None => self.environment.clone(),
                };

                let methods: HashMap<String, Function> = methods
                    .iter()
                    .map(|decl| {
                        let is_init = decl.name.lexeme == "init";
                        let function = Function::new(Rc::clone(decl), method_env.clone(), is_init);
                        (decl.name.lexeme.clone(), function)
                    })
                    .collect();

                let class = Class::new(&name.lexeme, superclass, methods);
                self.environment
                    .borrow_mut()
                    .assign(name, Value::Class(class))?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` with `environment` active, restoring the previous
    /// environment however the block exits.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: SharedEnv) -> Result<Flow> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal.clone())),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.token_type {
                    TokenType::MINUS => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(LoxError::runtime(operator, "Operand must be a number.")),
                    },
                    TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
                    _ => Err(LoxError::runtime(operator, "Invalid unary operator.")),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(operator, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuit = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        let found = self.environment.borrow_mut().assign_at(
                            distance,
                            &name.lexeme,
                            value.clone(),
                        );
                        if !found {
                            return Err(undefined_variable(name));
                        }
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
                let callee = self.evaluate(callee)?;

                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                let callable = callee.as_callable().ok_or_else(|| {
                    LoxError::runtime(paren, "Can only call functions and classes.")
                })?;

                if values.len() != callable.arity() {
                    return Err(LoxError::runtime(
                        paren,
                        format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            values.len()
                        ),
                    ));
                }

                debug!("Calling {} with {} arguments", callee, values.len());
                callable.call(self, values, paren)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.get(name),
                _ => Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let instance = match self.evaluate(object)? {
                    Value::Instance(instance) => instance,
                    _ => return Err(LoxError::runtime(name, "Only instances have fields.")),
                };

                let value = self.evaluate(value)?;
                instance.set(name, value.clone());
                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => {
                let distance = *self
                    .locals
                    .get(id)
                    .ok_or_else(|| undefined_variable(keyword))?;

                let superclass = match self.environment.borrow().get_at(distance, "super") {
                    Some(Value::Class(class)) => class,
                    _ => return Err(LoxError::runtime(keyword, "Superclass must be a class.")),
                };

                // `this` always sits in the scope just inside `super`.
                let instance = match distance
                    .checked_sub(1)
                    .and_then(|d| self.environment.borrow().get_at(d, "this"))
                {
                    Some(Value::Instance(instance)) => instance,
                    _ => {
                        return Err(LoxError::runtime(
                            keyword,
                            "Can't use 'super' outside of a method.",
                        ))
                    }
                };

                match superclass.find_method(&method.lexeme) {
                    Some(function) => Ok(Value::Function(function.bind(instance))),
                    None => Err(LoxError::runtime(
                        method,
                        format!("Undefined property '{}'.", method.lexeme),
                    )),
                }
            }
        }
    }

    /// Locals go straight to their resolved scope; anything unresolved is a
    /// global.
    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => self
                .environment
                .borrow()
                .get_at(distance, &name.lexeme)
                .ok_or_else(|| undefined_variable(name)),
            None => self.globals.borrow().get(name),
        }
    }
}

fn undefined_variable(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    use Value::{Bool, Number};

    match operator.token_type {
        TokenType::PLUS => match (left, right) {
            (Number(a), Number(b)) => Ok(Number(a + b)),
            (Value::String(a), Value::String(b)) => {
                Ok(Value::String(format!("{}{}", a, b).into()))
            }
            _ => Err(LoxError::runtime(
                operator,
                "Operands must be two numbers or two strings.",
            )),
        },

        TokenType::EQUAL_EQUAL => Ok(Bool(left == right)),
        TokenType::BANG_EQUAL => Ok(Bool(left != right)),

        _ => {
            let (a, b) = match (left, right) {
                (Number(a), Number(b)) => (a, b),
                _ => return Err(LoxError::runtime(operator, "Operands must be numbers.")),
            };

            match operator.token_type {
                TokenType::MINUS => Ok(Number(a - b)),
                TokenType::STAR => Ok(Number(a * b)),
                TokenType::SLASH => Ok(Number(a / b)),
                TokenType::GREATER => Ok(Bool(a > b)),
                TokenType::GREATER_EQUAL => Ok(Bool(a >= b)),
                TokenType::LESS => Ok(Bool(a < b)),
                TokenType::LESS_EQUAL => Ok(Bool(a <= b)),
                _ => Err(LoxError::runtime(operator, "Invalid binary operator.")),
            }
        }
    }
}
