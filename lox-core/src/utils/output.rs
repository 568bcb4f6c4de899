use std::{io::Write, sync::{Arc, RwLock}};

/// Sink for the lines a program writes with `print`.
pub trait OutputIO {
    fn print_line(&self, line: &str);
}

#[derive(Debug, Clone, Copy)]
pub struct StdoutIO;

impl OutputIO for StdoutIO {
    fn print_line(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();

        // A closed stdout (e.g. `loxc run x.lox | head`) must not abort the program.
        let _ = writeln!(lock, "{line}");
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NullOutputIO;

impl OutputIO for NullOutputIO {
    fn print_line(&self, _line: &str) {}
}

#[derive(Debug, Default, Clone)]
pub struct VectorOutputIO {
    pub lines: Arc<RwLock<Vec<String>>>
}

impl VectorOutputIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        let mut lines = self.write_lock();
        std::mem::take(&mut *lines)
    }

    pub fn reset(&self) {
        let mut lines = self.write_lock();
        lines.clear();
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<String>> {
        self.lines.write().expect("Vector lock poisoned")
    }
}

impl OutputIO for VectorOutputIO {
    fn print_line(&self, line: &str) {
        let mut lines = self.write_lock();

        lines.push(line.to_string());
    }
}
