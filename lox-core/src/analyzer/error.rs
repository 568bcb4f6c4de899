use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problems {
    errors: Vec<AnalyzeError>,
    warnings: Vec<Warning>,
}

impl Problems {
    pub fn error(&mut self, error: AnalyzeError) {
        self.errors.push(error)
    }

    pub fn take_errors(&mut self) -> Vec<AnalyzeError> {
        std::mem::take(&mut self.errors)
    }

    pub fn warning(&mut self, warning: Warning) {
        self.warnings.push(warning)
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn sort(&mut self) {
        self.errors.sort_by_key(|e| e.location().start);
        self.warnings.sort_by_key(|w| w.location().start);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalyzeError {
    /// Occurs when `return` appears outside of any function body.
    ///
    /// Example:
    /// ```text
    /// print 1;
    /// return 2; <- Can't return from top-level code.
    /// ```
    ReturnOutsideFunction {
        location: SrcSpan,
        line: u32,
    },
    /// Occurs when `break` appears outside of a loop. A function body starts
    /// a new context, so a loop around the declaration does not count.
    ///
    /// Example:
    /// ```text
    /// while (true) {
    ///     fun f() {
    ///         break; <- Can't break outside of a loop.
    ///     }
    /// }
    /// ```
    BreakOutsideLoop {
        location: SrcSpan,
        line: u32,
    },
}

impl AnalyzeError {
    pub fn location(&self) -> SrcSpan {
        match self {
            AnalyzeError::ReturnOutsideFunction { location, .. }
            | AnalyzeError::BreakOutsideLoop { location, .. } => *location
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            AnalyzeError::ReturnOutsideFunction { line, .. }
            | AnalyzeError::BreakOutsideLoop { line, .. } => *line
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AnalyzeError::ReturnOutsideFunction { .. } => "Can't return from top-level code.",
            AnalyzeError::BreakOutsideLoop { .. } => "Can't break outside of a loop.",
        }
    }
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error: {}", self.line(), self.message())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Warning {
    UnusedVariable {
        location: SrcSpan,
        name: String,
    },
    UnreachableIfClause {
        location: SrcSpan
    },
    UnreachableElseClause {
        location: SrcSpan
    },
    InfiniteLoop {
        location: SrcSpan
    },
    UnreachableWhileClause {
        location: SrcSpan
    },
    UnreachableCode {
        location: SrcSpan
    }
}

impl Warning {
    pub fn location(&self) -> SrcSpan {
        match self {
            Warning::UnusedVariable { location, .. }
            | Warning::UnreachableIfClause { location }
            | Warning::UnreachableElseClause { location }
            | Warning::InfiniteLoop { location }
            | Warning::UnreachableWhileClause { location }
            | Warning::UnreachableCode { location } => *location
        }
    }
}
