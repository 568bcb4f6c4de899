use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use lox_core::utils::prelude::Error;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub(crate) const EXIT_DATA_ERROR: i32 = 65;
pub(crate) const EXIT_SOFTWARE_ERROR: i32 = 70;
pub(crate) const EXIT_IO_ERROR: i32 = 74;

pub(crate) fn print_analyzing(text: &str) {
    print_colourful_prefix("Analyzing", Color::Magenta, text)
}

pub(crate) fn print_analyzed(duration: Duration) {
    print_colourful_prefix("Analyzed", Color::Green, &format!("in {}", seconds(duration)))
}

pub(crate) fn print_parsing(text: &str) {
    print_colourful_prefix("Parsing", Color::Cyan, text)
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    // Status lines are best effort, a closed stderr is not worth failing over.
    let _ = buffer.set_color(
        ColorSpec::new()
            .set_intense(true)
            .set_bold(true)
            .set_fg(Some(color)),
    );
    let _ = write!(buffer, "{prefix: >11}");
    let _ = buffer.set_color(&ColorSpec::new());
    let _ = writeln!(buffer, " {text}");
    let _ = buffer_writer.print(&buffer);
}

/// Renders every diagnostic of `err` to stderr.
pub fn report(err: &Error) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    err.pretty(&mut buffer);

    let _ = buffer_writer.print(&buffer);
}

/// Process exit status for a failed stage, following the sysexits convention.
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Parse { .. } | Error::Analyze { .. } => EXIT_DATA_ERROR,
        Error::Runtime { .. } => EXIT_SOFTWARE_ERROR,
        Error::StdIo { .. } => EXIT_IO_ERROR,
    }
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    if let Ok(force) = std::env::var("FORCE_COLOR") {
        !force.is_empty()
    } else {
        false
    }
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
