mod cli;
mod repl;

use std::{path::PathBuf, rc::Rc};

use clap::{Parser, Subcommand};
use cli::{exit_code, print_analyzed, print_analyzing, print_parsing, report, EXIT_DATA_ERROR};
use lox_core::{
    analyzer::analyze_from_stream,
    eval::prelude::{run_file, Interpreter, InterpreterConfig, DEFAULT_MAX_CALL_DEPTH},
    lexer::prelude::scan,
    parser::prelude::parse_program,
    utils::prelude::{Error, StdoutIO, Warning, WarningEmitterIO}
};

#[derive(Parser)]
#[command(name = "loxc", version, about = "Tree-walking interpreter for the Lox language")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a script
    Run {
        /// Path of source file
        path: PathBuf,
        /// Deepest allowed nesting of function calls
        #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_call_depth: usize,
    },
    /// Starts an interactive session [default when no command is given]
    Repl {
        /// Deepest allowed nesting of function calls
        #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_call_depth: usize,
    },
    /// Prints the token stream of a source file
    Tokens {
        /// Path of source file
        path: PathBuf,
    },
    /// Parses a source file and prints it back
    Parse {
        /// Path of source file
        path: PathBuf,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Performs lexical, syntactical and static analysis without running
    Check {
        /// Path of source file
        path: PathBuf,
    },
}

fn main() {
    init_tracing();

    let command = Cli::parse().command.unwrap_or(Command::Repl {
        max_call_depth: DEFAULT_MAX_CALL_DEPTH,
    });

    let code = match command {
        Command::Run { path, max_call_depth } => {
            let config = InterpreterConfig::default().with_max_call_depth(max_call_depth);
            let mut interpreter = Interpreter::new(config, Rc::new(StdoutIO));

            match run_file(path, &mut interpreter, Rc::new(ConsoleWarningEmitter)) {
                Ok(_) => 0,
                Err(err) => fail(&err),
            }
        },
        Command::Repl { max_call_depth } => {
            let config = InterpreterConfig::default().with_max_call_depth(max_call_depth);

            match repl::start(config) {
                Ok(()) => 0,
                Err(err) => fail(&Error::StdIo { err: err.kind() }),
            }
        },
        Command::Tokens { path } => match std::fs::read_to_string(&path) {
            Ok(src) => match scan(&src) {
                Ok(tokens) => {
                    tokens.iter().for_each(|token| println!("{token}"));
                    0
                },
                Err(errors) => {
                    errors.iter().for_each(|err| eprintln!("{err}"));
                    EXIT_DATA_ERROR
                }
            },
            Err(err) => fail(&Error::StdIo { err: err.kind() }),
        },
        Command::Parse { path, print_ast } => {
            print_parsing(&path.to_string_lossy());

            let parsed = std::fs::read_to_string(&path)
                .map_err(|err| Error::StdIo { err: err.kind() })
                .and_then(|src| match parse_program(&src) {
                    Ok(parsed) => Ok(parsed),
                    Err(errors) => Err(Error::Parse { path, src, errors }),
                });

            match parsed {
                Ok(parsed) if print_ast => {
                    println!("{:#?}", parsed.statements);
                    0
                },
                Ok(parsed) => {
                    println!("{parsed}");
                    0
                },
                Err(err) => fail(&err),
            }
        },
        Command::Check { path } => {
            print_analyzing(&path.to_string_lossy());
            let start = std::time::Instant::now();

            match analyze_from_stream(path, Rc::new(ConsoleWarningEmitter)) {
                Ok(_) => {
                    print_analyzed(std::time::Instant::now() - start);
                    0
                },
                Err(err) => fail(&err),
            }
        },
    };

    std::process::exit(code);
}

fn fail(err: &Error) -> i32 {
    report(err);
    exit_code(err)
}

/// Logs go to stderr and only when `RUST_LOG` asks for them.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleWarningEmitter;

impl WarningEmitterIO for ConsoleWarningEmitter {
    fn emit_warning(&self, warning: Warning) {
        let buffer_writer = crate::cli::stderr_buffer_writer();
        let mut buffer = buffer_writer.buffer();
        warning.pretty(&mut buffer);
        let _ = buffer_writer.print(&buffer);
    }
}
