pub mod error;
pub mod analyzer;

pub mod prelude {
    pub use super::{
        analyzer::*,
        error::*
    };
}

use std::{path::PathBuf, rc::Rc};

use utf8_chars::BufReadCharsExt;

use crate::{
    analyzer::prelude::{Outcome, ProgramAnalyzer},
    parser::prelude::{parse_program, parse_program_from_stream, Parsed, ParseError},
    utils::prelude::{Error, ProgramWarningEmitter, WarningEmitter, WarningEmitterIO}
};

/// A program that scanned, parsed and passed the static check, with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Analyzed {
    pub path: PathBuf,
    pub src: String,
    pub parsed: Parsed,
}

/// Runs in-memory source through the front end; `path` is only used in diagnostics.
pub fn analyze_source(
    path: PathBuf,
    src: String,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Analyzed, Error> {
    let parsed = parse_program(&src);

    check(path, src, parsed, warnings)
}

/// Reads the file at `path` and runs it through the front end, scanning
/// characters as they are read.
pub fn analyze_from_stream(
    path: PathBuf,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Analyzed, Error> {
    let file = std::fs::File::open(&path)
        .map_err(|err| Error::StdIo { err: err.kind() })?;

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut io_error = None;
    let mut reader = std::io::BufReader::new(file);

    let stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                io_error = Some(err.kind());
                None
            }
        });

    let parsed = parse_program_from_stream(stream);

    if let Some(err) = io_error {
        return Err(Error::StdIo { err });
    }

    check(path, src, parsed, warnings)
}

fn check(
    path: PathBuf,
    src: String,
    parsed: Result<Parsed, Vec<ParseError>>,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Analyzed, Error> {
    let parsed = match parsed {
        Ok(parsed) => parsed,
        Err(errors) => return Err(Error::Parse { path, src, errors }),
    };

    let emitter = ProgramWarningEmitter::new(
        path.clone(),
        src.clone(),
        WarningEmitter::new(warnings)
    );

    match ProgramAnalyzer::analyze(parsed, &emitter) {
        Outcome::Ok(parsed) => Ok(Analyzed { path, src, parsed }),
        Outcome::PartialFailure(_, errors) => Err(Error::Analyze { path, src, errors }),
    }
}

#[cfg(test)]
mod tests;
