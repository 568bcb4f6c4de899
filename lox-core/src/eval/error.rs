use crate::{lexer::prelude::Token, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeErrorType {
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String },
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    InvalidAddition,
    /// Either operand of `/` is zero.
    #[error("Division by 0 is not allowed.")]
    DivisionByZero,
    #[error("Can't call non-callable object.")]
    NotCallable,
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch { expected: usize, got: usize },
    /// Nested calls exceeded `InterpreterConfig::max_call_depth`.
    #[error("Stack overflow.")]
    StackOverflow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub span: SrcSpan,
    pub line: u32,
}

impl RuntimeError {
    pub fn at(token: &Token, error: RuntimeErrorType) -> Self {
        Self {
            error,
            span: token.span,
            line: token.line,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.error)
    }
}

impl std::error::Error for RuntimeError {}
