use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedCharacter { ch: char },
    UnterminatedString,
    UnterminatedComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan,
    pub line: u32,
}

impl LexicalError {
    pub fn details(&self) -> (String, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedCharacter { ch } => {
                (format!("Unexpected character '{ch}'."), vec![])
            },
            LexicalErrorType::UnterminatedString => {
                ("Unterminated string.".to_string(), vec!["A string literal needs a closing `\"`.".to_string()])
            },
            LexicalErrorType::UnterminatedComment => {
                ("Unterminated block comment.".to_string(), vec!["A block comment needs a closing `*/`.".to_string()])
            },
        }
    }
}

impl std::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.details().0)
    }
}
