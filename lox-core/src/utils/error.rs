use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    analyzer::prelude::AnalyzeError,
    eval::prelude::RuntimeError,
    parser::prelude::ParseError,
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        errors: Vec<ParseError>
    },
    #[error("static check failed")]
    Analyze {
        path: PathBuf,
        src: String,
        errors: Vec<AnalyzeError>
    },
    #[error("runtime error: {error}")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            let _ = writeln!(buf);
        }
    }

    /// One plain `[line N] Error...` line per reported problem.
    pub fn headlines(&self) -> Vec<String> {
        match self {
            Error::Parse { errors, .. } => errors.iter().map(|error| error.to_string()).collect(),
            Error::Analyze { errors, .. } => errors.iter().map(|error| error.to_string()).collect(),
            Error::Runtime { error, .. } => vec![error.to_string()],
            Error::StdIo { err } => vec![format!("Error: {err}")],
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, errors } => {
                errors.iter()
                    .map(|error| {
                        let (title, extra) = error.details();

                        Diagnostic {
                            title,
                            text: extra.join("\n"),
                            line: Some(error.line),
                            level: Level::Error,
                            location: Some(Location {
                                src,
                                path: path.clone(),
                                label: Label {
                                    text: Some(error.message()),
                                    span: error.span,
                                },
                                extra_labels: vec![],
                            }),
                        }
                    })
                    .collect()
            },
            Error::Analyze { path, src, errors } => {
                errors.iter()
                    .map(|error| Diagnostic {
                        title: format!("Error: {}", error.message()),
                        text: "".into(),
                        line: Some(error.line()),
                        level: Level::Error,
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            label: Label {
                                text: None,
                                span: error.location(),
                            },
                            extra_labels: vec![],
                        }),
                    })
                    .collect()
            },
            Error::Runtime { path, src, error } => {
                vec![Diagnostic {
                    title: format!("Runtime error: {}", error.message()),
                    text: "".into(),
                    line: Some(error.line),
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: None,
                            span: error.span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    line: None,
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}
