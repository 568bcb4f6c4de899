pub mod callable;
pub mod config;
pub mod control;
pub mod error;
pub mod interpreter;
pub mod natives;

pub mod prelude {
    pub use super::{
        callable::*,
        config::*,
        control::*,
        error::*,
        interpreter::*,
        natives::*,
        run,
        run_file
    };
}

use std::{path::PathBuf, rc::Rc};

use crate::{
    analyzer::{analyze_from_stream, analyze_source, Analyzed},
    environment::prelude::Value,
    utils::prelude::{Error, WarningEmitterIO}
};

use interpreter::Interpreter;

/// Scans, parses, checks and evaluates `src` with `interpreter`.
///
/// Returns the value of a trailing expression statement, if any. Globals
/// defined by `src` stay in `interpreter` for the next call.
pub fn run(
    path: PathBuf,
    src: String,
    interpreter: &mut Interpreter,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Option<Value>, Error> {
    let analyzed = analyze_source(path, src, warnings)?;

    execute(analyzed, interpreter)
}

/// Streams the file at `path` through the front end, then evaluates it.
pub fn run_file(
    path: PathBuf,
    interpreter: &mut Interpreter,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Option<Value>, Error> {
    let analyzed = analyze_from_stream(path, warnings)?;

    execute(analyzed, interpreter)
}

fn execute(analyzed: Analyzed, interpreter: &mut Interpreter) -> Result<Option<Value>, Error> {
    let Analyzed { path, src, parsed } = analyzed;

    interpreter.interpret(&parsed.statements)
        .map_err(|error| Error::Runtime { path, src, error })
}

#[cfg(test)]
mod tests;
