use std::{fmt::Display, rc::Rc};

use crate::{eval::prelude::Callable, lexer::prelude::Literal, parser::prelude::Primitive};

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Callable(Rc<dyn Callable>),
}

impl Value {
    /// `nil` and `false` are falsey, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }

    /// Text written by `print`.
    ///
    /// Numbers are formatted with six fixed decimals and only the exact `.000000`
    /// suffix is trimmed, so `3` prints as `3` while `2.5` prints as `2.500000`.
    pub fn print_string(&self) -> String {
        match self {
            Value::Number(value) => {
                let fixed = format!("{value:.6}");

                match fixed.strip_suffix(".000000") {
                    Some(integer) => integer.to_string(),
                    None => fixed,
                }
            },
            value => value.to_string(),
        }
    }
}

// Cross-type comparisons are `false`, never an error. Callables compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Number(value) => write!(f, "{}", shortest_number(*value)),
            Value::String(value) => write!(f, "{value}"),
            Value::Callable(callable) => write!(f, "{callable}"),
        }
    }
}

/// Shortest round-trip form of `value`, switching to exponent notation below
/// `1e-4` and from `1e21` up, with a signed exponent of at least two digits.
fn shortest_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf".into() } else { "-Inf".into() };
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();

    if value == 0.0 || (-4..21).contains(&exponent) {
        return value.to_string();
    }

    let sign = if exponent < 0 { '-' } else { '+' };

    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

impl From<&Primitive> for Value {
    fn from(value: &Primitive) -> Self {
        match value {
            Primitive::Nil => Value::Nil,
            Primitive::Bool(value) => Value::Boolean(*value),
            Primitive::Number(value) => Value::Number(*value),
            Primitive::String(value) => Value::String(value.clone()),
        }
    }
}

impl From<&Literal> for Value {
    fn from(value: &Literal) -> Self {
        match value {
            Literal::Number(value) => Value::Number(*value),
            Literal::String(value) => Value::String(value.clone()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}
