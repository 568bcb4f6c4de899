use std::{rc::Rc, time::{SystemTime, UNIX_EPOCH}};

use crate::environment::prelude::{Environment, Value};

use super::{callable::NativeFunction, error::RuntimeError};

pub const NATIVES: &[NativeFunction] = &[
    NativeFunction { name: "clock", arity: 0, function: clock },
];

/// Seeds `globals` with every built-in function.
pub fn define_natives(globals: &mut Environment) {
    for native in NATIVES {
        globals.define(native.name, Value::Callable(Rc::new(native.clone())));
    }
}

/// Seconds since the Unix epoch, with sub-second precision.
fn clock(_arguments: &[Value]) -> Result<Value, RuntimeError> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64());

    Ok(Value::Number(seconds))
}
