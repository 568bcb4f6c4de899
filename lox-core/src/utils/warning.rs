use std::{path::PathBuf, rc::Rc, sync::{atomic::{AtomicUsize, Ordering}, Arc, RwLock}};

use termcolor::Buffer;

use crate::analyzer::error::Warning as AnalyzerWarning;
use super::diagnostic::{Diagnostic, Label, Level, Location};

pub trait WarningEmitterIO {
    fn emit_warning(&self, warning: Warning);
}

#[derive(Debug, Clone, Copy)]
pub struct NullWarningEmitterIO;

impl WarningEmitterIO for NullWarningEmitterIO {
    fn emit_warning(&self, _warning: Warning) {}
}

#[derive(Debug, Default, Clone)]
pub struct VectorWarningEmitterIO {
    pub warnings: Arc<RwLock<Vec<Warning>>>
}

impl VectorWarningEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Warning> {
        let mut warnings = self.write_lock();
        std::mem::take(&mut *warnings)
    }

    pub fn reset(&self) {
        let mut warnings = self.write_lock();
        warnings.clear();
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Warning>> {
        self.warnings.write().expect("Vector lock poisoned")
    }
}

impl WarningEmitterIO for VectorWarningEmitterIO {
    fn emit_warning(&self, warning: Warning) {
        let mut warnings = self.write_lock();

        warnings.push(warning);
    }
}

/// Counts warnings on their way to the underlying sink.
pub struct WarningEmitter {
    count: Arc<AtomicUsize>,
    emitter: Rc<dyn WarningEmitterIO>
}

impl WarningEmitter {
    pub fn new(emitter: Rc<dyn WarningEmitterIO>) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            emitter,
        }
    }

    pub fn null() -> Self {
        Self::new(Rc::new(NullWarningEmitterIO))
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn emit(&self, warning: Warning) {
        _ = self.count.fetch_add(1, Ordering::Relaxed);
        self.emitter.emit_warning(warning);
    }
}

/// Attaches the program's path and source to analyzer warnings.
pub struct ProgramWarningEmitter {
    path: PathBuf,
    src: String,
    emitter: WarningEmitter,
}

impl ProgramWarningEmitter {
    pub fn new(path: PathBuf, src: String, emitter: WarningEmitter) -> Self {
        Self { path, src, emitter }
    }

    pub fn null() -> Self {
        Self::new(PathBuf::new(), String::new(), WarningEmitter::null())
    }

    pub fn emit(&self, warning: AnalyzerWarning) {
        self.emitter.emit(Warning::Program {
            path: self.path.clone(),
            src: self.src.clone(),
            warning,
        });
    }
}

#[derive(Debug, Clone)]
pub enum Warning {
    Program {
        path: PathBuf,
        src: String,
        warning: AnalyzerWarning
    }
}

impl Warning {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        self.to_diagnostic().write(buf);
        // Buffers are in memory, writing to them cannot fail.
        let _ = buf.write_all(b"\n");
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let Warning::Program { path, src, warning } = self;

        let (title, label) = match warning {
            AnalyzerWarning::UnusedVariable { name, .. } => {
                (format!("Unused variable '{name}'"), Some("This value is never read".to_string()))
            },
            AnalyzerWarning::UnreachableIfClause { .. } => ("Unreachable if clause".to_string(), None),
            AnalyzerWarning::UnreachableElseClause { .. } => ("Unreachable else clause".to_string(), None),
            AnalyzerWarning::InfiniteLoop { .. } => {
                ("Infinite loop".to_string(), Some("This loop never breaks or returns".to_string()))
            },
            AnalyzerWarning::UnreachableWhileClause { .. } => ("Unreachable while clause".to_string(), None),
            AnalyzerWarning::UnreachableCode { .. } => ("Unreachable code".to_string(), None),
        };

        let location = warning.location();

        Diagnostic {
            title,
            text: "".into(),
            line: Some(location.line_in(src)),
            level: Level::Warning,
            location: Some(Location {
                src,
                path: path.to_path_buf(),
                label: Label {
                    text: label,
                    span: location,
                },
                extra_labels: vec![]
            }),
        }
    }
}
