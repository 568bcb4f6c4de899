use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{eval::prelude::{RuntimeError, RuntimeErrorType}, lexer::prelude::Token};

use super::prelude::Value;

pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope. Scopes are shared through [`EnvRef`] so a closure can keep
/// the scope it was declared in alive after the block that created it has exited.
#[derive(Default)]
pub struct Environment {
    pub store: HashMap<String, Value>,
    pub enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn new_ref() -> EnvRef {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn with_enclosing(enclosing: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    /// Binds `name` in this scope, overwriting an existing binding of the same scope.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.store.insert(name.into(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.store.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name),
            None => Err(undefined(name)),
        }
    }

    /// Rebinds the innermost existing `name`; never creates a new binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.store.get_mut(&name.lexeme) {
            *slot = value;
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(undefined(name)),
        }
    }

    pub fn depth(&self) -> usize {
        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().depth() + 1,
            None => 0,
        }
    }
}

// Closures stored in a scope usually capture that same scope, so the bindings
// are listed by name only.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.store.keys().collect::<Vec<&String>>();
        names.sort();

        f.debug_struct("Environment")
            .field("names", &names)
            .field("depth", &self.depth())
            .finish()
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::at(name, RuntimeErrorType::UndefinedVariable { name: name.lexeme.clone() })
}
