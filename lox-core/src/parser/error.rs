use crate::{lexer::prelude::{LexicalError, Token, TokenKind}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    /// A required token is missing; `message` names what was expected.
    ExpectedToken { message: &'static str },
    ExpectedExpression,
    InvalidAssignmentTarget,
    UnsupportedClass,
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan,
    pub line: u32,
    // offending token, `None` for lexical errors
    pub found: Option<(TokenKind, String)>,
}

impl ParseError {
    pub fn at(token: &Token, error: ParseErrorType) -> Self {
        Self {
            error,
            span: token.span,
            line: token.line,
            found: Some((token.kind, token.lexeme.clone())),
        }
    }

    pub fn message(&self) -> String {
        match &self.error {
            ParseErrorType::ExpectedToken { message } => message.to_string(),
            ParseErrorType::ExpectedExpression => "Expect expression.".to_string(),
            ParseErrorType::InvalidAssignmentTarget => "Invalid assignment target.".to_string(),
            ParseErrorType::UnsupportedClass => "Classes are not supported.".to_string(),
            ParseErrorType::LexError { error } => error.details().0,
        }
    }

    /// `" at end"`, `" at 'x'"` or nothing, mirroring where the error was found.
    pub fn site(&self) -> String {
        match &self.found {
            Some((TokenKind::Eof, _)) => " at end".to_string(),
            Some((_, lexeme)) => format!(" at '{lexeme}'"),
            None => String::new(),
        }
    }

    pub fn details(&self) -> (String, Vec<String>) {
        let extra = match &self.error {
            ParseErrorType::LexError { error } => error.details().1,
            ParseErrorType::ExpectedToken { .. } | ParseErrorType::ExpectedExpression => {
                match &self.found {
                    Some((kind, _)) if kind.is_reserved_word() => {
                        vec![format!("Found the keyword `{}`.", kind.as_literal())]
                    },
                    _ => vec![],
                }
            },
            _ => vec![],
        };

        (format!("Error{}: {}", self.site(), self.message()), extra)
    }
}

impl From<LexicalError> for ParseError {
    fn from(error: LexicalError) -> Self {
        Self {
            span: error.location,
            line: error.line,
            error: ParseErrorType::LexError { error },
            found: None,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] {}", self.line, self.details().0)
    }
}
