use std::path::PathBuf;
pub use codespan_reporting::diagnostic::{LabelStyle, Severity};
use codespan_reporting::{diagnostic::Label as CodespanLabel, files::SimpleFiles};
use termcolor::Buffer;
use super::src_span::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub text: Option<String>,
    pub span: SrcSpan
}

impl Label {
    pub fn to_codespan_label(&self, file_id: usize, label_style: Option<LabelStyle>) -> CodespanLabel<usize> {
        let label = CodespanLabel::new(
            label_style.unwrap_or(LabelStyle::Primary),
            file_id,
            (self.span.start as usize)..(self.span.end as usize),
        );

        match &self.text {
            None => label,
            Some(text) => label.with_message(text.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Location<'a> {
    pub src: &'a str,
    pub path: PathBuf,
    pub label: Label,
    pub extra_labels: Vec<Label>,
}

/// A renderable report. `line` is always part of the rendered title so the
/// report stays meaningful without the source snippet.
#[derive(Debug, Clone)]
pub struct Diagnostic<'a> {
    pub title: String,
    pub text: String,
    pub line: Option<u32>,
    pub level: Level,
    pub location: Option<Location<'a>>
}

impl<'a> Diagnostic<'a> {
    pub fn headline(&self) -> String {
        match self.line {
            Some(line) => format!("[line {line}] {}", self.title),
            None => self.title.clone(),
        }
    }

    pub fn write(&self, buf: &mut Buffer) {
        use std::io::Write;

        match &self.location {
            Some(location) if span_fits(location) => self.write_span(location, buf),
            _ => self.write_title(buf),
        }

        if !self.text.is_empty() {
            let _ = writeln!(buf, "{}", self.text);
        }
    }

    pub fn write_span(&self, location: &Location, buf: &mut Buffer) {
        let mut files = SimpleFiles::new();

        let location_path = location.path.to_string_lossy().into_owned();
        let file_id = files.add(location_path, location.src);

        let mut labels = vec![location.label.to_codespan_label(file_id, None)];

        location.extra_labels.iter()
            .for_each(|label| {
                labels.push(label.to_codespan_label(file_id, Some(LabelStyle::Secondary)))
            });

        let severity = match self.level {
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
        };

        let diagnostic = codespan_reporting::diagnostic::Diagnostic::new(severity)
            .with_message(self.headline())
            .with_labels(labels);

        let config = codespan_reporting::term::Config::default();
        // Spans are checked by `span_fits` and the buffer is in memory.
        let _ = codespan_reporting::term::emit(buf, &config, &files, &diagnostic);
    }

    pub fn write_title(&self, buf: &mut Buffer) {
        use std::io::Write;
        use termcolor::{Color, ColorSpec, WriteColor};

        let (kind, colour) = match self.level {
            Level::Error => ("error", Color::Red),
            Level::Warning => ("warning", Color::Yellow),
        };

        let _ = buf.set_color(ColorSpec::new().set_bold(true).set_fg(Some(colour)));
        let _ = write!(buf, "{kind}");

        let _ = buf.set_color(ColorSpec::new().set_bold(true));
        let _ = writeln!(buf, ": {}", self.headline());

        let _ = buf.reset();
    }
}

// codespan panics on ranges outside the file or off char boundaries.
fn span_fits(location: &Location) -> bool {
    let SrcSpan { start, end } = location.label.span;
    let (start, end) = (start as usize, end as usize);

    start <= end
        && end <= location.src.len()
        && location.src.is_char_boundary(start)
        && location.src.is_char_boundary(end)
}
