use std::{io::Write, path::PathBuf, rc::Rc};

use lox_core::{
	eval::prelude::{run, Interpreter, InterpreterConfig},
	utils::prelude::StdoutIO
};

use crate::{cli, ConsoleWarningEmitter};

const PROMPT: &str = "> ";

/// Read-eval-print loop. Globals live as long as the loop does.
pub fn start(config: InterpreterConfig) -> std::io::Result<()> {
	if let Err(err) = ctrlc::set_handler(|| {
		println!();
		std::process::exit(0);
	}) {
		tracing::warn!(%err, "could not install the Ctrl-C handler");
	}

	let stdin = std::io::stdin();
	let warnings = Rc::new(ConsoleWarningEmitter);
	let mut interpreter = Interpreter::new(config, Rc::new(StdoutIO));

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			println!();
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				match run(PathBuf::from("<repl>"), input, &mut interpreter, warnings.clone()) {
					Ok(Some(value)) => println!("{value}"),
					Ok(None) => {},
					Err(err) => cli::report(&err),
				}
			}
		}
	}
}
