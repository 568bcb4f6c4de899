use std::rc::Rc;

use crate::{
    environment::prelude::{EnvRef, Environment, Value},
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{Expr, Stmt},
    utils::prelude::{ensure_sufficient_stack, OutputIO}
};

use super::{
    callable::LoxFunction,
    config::InterpreterConfig,
    control::Flow,
    error::{RuntimeError, RuntimeErrorType},
    natives::define_natives
};

type EvalResult<T = Value> = Result<T, RuntimeError>;

/// Tree-walking evaluator.
///
/// Holds the global scope for its whole lifetime, so consecutive calls to
/// [`Interpreter::interpret`] (one per REPL line) share their globals.
pub struct Interpreter {
    pub globals: EnvRef,
    environment: EnvRef,
    config: InterpreterConfig,
    output: Rc<dyn OutputIO>,
    call_depth: usize,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig, output: Rc<dyn OutputIO>) -> Self {
        let globals = Environment::new_ref();

        define_natives(&mut globals.borrow_mut());

        Self {
            environment: globals.clone(),
            globals,
            config,
            output,
            call_depth: 0,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Runs `statements` in order and returns the value of the last statement
    /// when it is an expression statement.
    pub fn interpret(&mut self, statements: &[Stmt]) -> EvalResult<Option<Value>> {
        let mut trailing = None;

        for statement in statements {
            trailing = None;

            match statement {
                Stmt::Expression { expression } => {
                    trailing = Some(self.evaluate(expression)?);
                },
                statement => {
                    // `return`/`break` never reach top level once the analyzer has run.
                    if !self.execute(statement)?.is_normal() {
                        break;
                    }
                }
            }
        }

        Ok(trailing)
    }

    pub fn execute(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.execute_statement(statement))
    }

    fn execute_statement(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        match statement {
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
            },
            Stmt::Print { expression, .. } => {
                let value = self.evaluate(expression)?;

                self.output.print_line(&value.print_string());
            },
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(name.lexeme.as_str(), value);
            },
            Stmt::Block { statements, .. } => {
                let scope = Environment::with_enclosing(self.environment.clone());

                return self.execute_block(statements, scope);
            },
            Stmt::If { condition, then_branch, else_branch, .. } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                }

                if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            },
            Stmt::While { condition, body, .. } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Flow::Normal => {},
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
            },
            Stmt::Function(declaration) => {
                tracing::trace!(function = %declaration.name.lexeme, "declaring function");

                let function = LoxFunction::new(declaration.clone(), self.environment.clone());

                self.environment.borrow_mut().define(
                    declaration.name.lexeme.as_str(),
                    Value::Callable(Rc::new(function))
                );
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };

                return Ok(Flow::Return(value));
            },
            Stmt::Break { .. } => return Ok(Flow::Break),
        }

        Ok(Flow::Normal)
    }

    /// Runs `statements` inside `scope`, restoring the current scope on every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], scope: EnvRef) -> EvalResult<Flow> {
        let previous = std::mem::replace(&mut self.environment, scope);

        let result = self.execute_sequence(statements);

        self.environment = previous;

        result
    }

    fn execute_sequence(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        for statement in statements {
            let flow = self.execute(statement)?;

            if !flow.is_normal() {
                return Ok(flow);
            }
        }

        Ok(Flow::Normal)
    }

    pub fn evaluate(&mut self, expression: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.evaluate_expression(expression))
    }

    fn evaluate_expression(&mut self, expression: &Expr) -> EvalResult {
        match expression {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Grouping { expression, .. } => self.evaluate(expression),
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;

                eval_unary(operator, right)
            },
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                eval_binary(operator, left, right)
            },
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                let short_circuits = match operator.kind {
                    TokenKind::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            },
            Expr::Variable { name } => self.environment.borrow().get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;

                self.environment.borrow_mut().assign(name, value.clone())?;

                Ok(value)
            },
            Expr::Call { callee, paren, arguments } => {
                let callee = self.evaluate(callee)?;

                let arguments = arguments.iter()
                    .map(|argument| self.evaluate(argument))
                    .collect::<EvalResult<Vec<Value>>>()?;

                self.call(paren, callee, arguments)
            },
        }
    }

    fn call(&mut self, paren: &Token, callee: Value, arguments: Vec<Value>) -> EvalResult {
        let Value::Callable(callable) = callee else {
            return Err(RuntimeError::at(paren, RuntimeErrorType::NotCallable));
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError::at(paren, RuntimeErrorType::ArityMismatch {
                expected: callable.arity(),
                got: arguments.len(),
            }));
        }

        if self.call_depth >= self.config.max_call_depth {
            tracing::warn!(limit = self.config.max_call_depth, "call depth limit reached");

            return Err(RuntimeError::at(paren, RuntimeErrorType::StackOverflow));
        }

        self.call_depth += 1;
        let result = callable.call(self, arguments);
        self.call_depth -= 1;

        result
    }
}

fn eval_unary(operator: &Token, right: Value) -> EvalResult {
    match operator.kind {
        TokenKind::Bang => Ok(Value::Boolean(!right.is_truthy())),
        _ => match right {
            Value::Number(value) => Ok(Value::Number(-value)),
            _ => Err(RuntimeError::at(operator, RuntimeErrorType::OperandMustBeNumber)),
        }
    }
}

fn eval_binary(operator: &Token, left: Value, right: Value) -> EvalResult {
    let error = |error: RuntimeErrorType| -> EvalResult { Err(RuntimeError::at(operator, error)) };

    match operator.kind {
        TokenKind::EqualEqual => return Ok(Value::Boolean(left == right)),
        TokenKind::BangEqual => return Ok(Value::Boolean(left != right)),
        TokenKind::Plus => {
            return match (left, right) {
                (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
                (Value::String(left), Value::String(right)) => Ok(Value::from(format!("{left}{right}").as_str())),
                (left @ Value::String(_), right @ Value::Number(_))
                | (left @ Value::Number(_), right @ Value::String(_)) => {
                    Ok(Value::from(format!("{left}{right}").as_str()))
                },
                _ => error(RuntimeErrorType::InvalidAddition),
            };
        },
        _ => {}
    }

    let (Value::Number(left), Value::Number(right)) = (left, right) else {
        return error(RuntimeErrorType::OperandsMustBeNumbers);
    };

    Ok(match operator.kind {
        TokenKind::Minus => Value::Number(left - right),
        TokenKind::Star => Value::Number(left * right),
        TokenKind::Slash => {
            if left == 0.0 || right == 0.0 {
                return error(RuntimeErrorType::DivisionByZero);
            }

            Value::Number(left / right)
        },
        TokenKind::Greater => Value::Boolean(left > right),
        TokenKind::GreaterEqual => Value::Boolean(left >= right),
        TokenKind::Less => Value::Boolean(left < right),
        TokenKind::LessEqual => Value::Boolean(left <= right),
        _ => unreachable!("`{}` is not a binary operator", operator.lexeme),
    })
}
