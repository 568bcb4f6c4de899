use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Literal, Token, TokenKind};
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;

pub type LexResult = std::result::Result<Token, LexicalError>;

/// Streaming scanner over `(byte offset, char)` pairs.
///
/// Yields every token of the input followed by a single `Eof` token, then
/// stops. Lexical errors are yielded in place and scanning resumes after the
/// offending input, so one pass reports every lexical error.
#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	ch: Option<(u32, char)>,
	next_ch: Option<(u32, char)>,
	end: u32,
	line: u32,
	lexeme: String,
	finished: bool,
	input: T,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tline: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.offset(), self.line, self.peek(), self.peek_next()
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		let mut lexer = Self {
			ch: None,
			next_ch: None,
			end: 0,
			line: 1,
			lexeme: String::new(),
			finished: false,
			input,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn next_token(&mut self) -> LexResult {
		loop {
			self.lexeme.clear();

			let start = self.offset();

			let ch = match self.next_char() {
				Some(ch) => ch,
				None => return Ok(Token::new(
					TokenKind::Eof,
					"",
					self.line,
					SrcSpan::from(start, start)
				)),
			};

			let kind = match ch {
				'(' => TokenKind::LeftParen,
				')' => TokenKind::RightParen,
				'{' => TokenKind::LeftBrace,
				'}' => TokenKind::RightBrace,
				',' => TokenKind::Comma,
				'.' => TokenKind::Dot,
				'-' => TokenKind::Minus,
				'+' => TokenKind::Plus,
				';' => TokenKind::Semicolon,
				'*' => TokenKind::Star,
				'!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
				'=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
				'<' => self.either('=', TokenKind::LessEqual, TokenKind::Less),
				'>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater),
				'/' => match self.peek() {
					Some('/') => {
						self.skip_line_comment();
						continue;
					},
					Some('*') => {
						self.skip_block_comment(start)?;
						continue;
					},
					_ => TokenKind::Slash
				},
				'"' => return self.lex_string(start),
				'0'..='9' => return Ok(self.lex_number(start)),
				c if c.is_ascii_alphabetic() || c == '_' => return Ok(self.lex_ident(start)),
				' ' | '\r' | '\t' | '\n' => continue,
				c => {
					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedCharacter { ch: c },
						location: SrcSpan::from(start, self.offset()),
						line: self.line,
					});
				}
			};

			return Ok(self.make_token(kind, start));
		}
	}

	fn offset(&self) -> u32 {
		match self.ch {
			Some((pos, _)) => pos,
			None => self.end,
		}
	}

	fn peek(&self) -> Option<char> {
		self.ch.map(|(_, ch)| ch)
	}

	fn peek_next(&self) -> Option<char> {
		self.next_ch.map(|(_, ch)| ch)
	}

	fn next_char(&mut self) -> Option<char> {
		let current = self.ch.take();

		self.ch = self.next_ch.take();
		self.next_ch = self.input.next();

		let (pos, ch) = current?;

		self.end = pos + ch.len_utf8() as u32;
		self.lexeme.push(ch);

		if ch == '\n' {
			self.line += 1;
		}

		Some(ch)
	}

	fn either(&mut self, expected: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
		if self.peek() == Some(expected) {
			self.next_char();
			matched
		} else {
			otherwise
		}
	}

	fn make_token(&mut self, kind: TokenKind, start: u32) -> Token {
		let lexeme = std::mem::take(&mut self.lexeme);

		Token::new(kind, lexeme, self.line, SrcSpan::from(start, self.offset()))
	}

	fn skip_line_comment(&mut self) {
		while !matches!(self.peek(), Some('\n') | None) {
			self.next_char();
		}
	}

	// Ends at the first `*/`; block comments do not nest.
	fn skip_block_comment(&mut self, start: u32) -> Result<(), LexicalError> {
		self.next_char(); // skip `*`

		loop {
			match (self.peek(), self.peek_next()) {
				(Some('*'), Some('/')) => {
					self.next_char();
					self.next_char();

					return Ok(());
				},
				(Some(_), _) => {
					self.next_char();
				},
				(None, _) => return Err(LexicalError {
					error: LexicalErrorType::UnterminatedComment,
					location: SrcSpan::from(start, self.offset()),
					line: self.line,
				})
			}
		}
	}

	fn lex_string(&mut self, start: u32) -> LexResult {
		loop {
			match self.peek() {
				Some('"') => {
					self.next_char();
					break;
				},
				Some(_) => {
					self.next_char();
				},
				None => return Err(LexicalError {
					error: LexicalErrorType::UnterminatedString,
					location: SrcSpan::from(start, self.offset()),
					line: self.line,
				})
			}
		}

		// Both quotes are single-byte, so slicing them off stays on char boundaries.
		let value = &self.lexeme[1..self.lexeme.len() - 1];
		let literal = Literal::String(value.into());

		Ok(self.make_token(TokenKind::String, start).with_literal(literal))
	}

	fn lex_number(&mut self, start: u32) -> Token {
		self.eat_digits();

		if self.peek() == Some('.') && self.peek_next().is_some_and(|ch| ch.is_ascii_digit()) {
			self.next_char(); // skip `.`
			self.eat_digits();
		}

		// Digits with an optional fraction always form a valid float.
		let value = self.lexeme.parse::<f64>().unwrap_or_default();

		self.make_token(TokenKind::Number, start).with_literal(Literal::Number(value))
	}

	fn eat_digits(&mut self) {
		while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
			self.next_char();
		}
	}

	fn lex_ident(&mut self, start: u32) -> Token {
		while self.peek().is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
			self.next_char();
		}

		let kind = str_to_keyword(&self.lexeme).unwrap_or(TokenKind::Identifier);

		self.make_token(kind, start)
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(&token, Ok(token) if token.is(TokenKind::Eof)) {
			self.finished = true;
		}

		Some(token)
	}
}

/// Scans `source` to completion, collecting every lexical error.
pub fn scan(source: &str) -> Result<Vec<Token>, Vec<LexicalError>> {
	let lexer = Lexer::new(source.char_indices().map(|(i, c)| (i as u32, c)));

	let mut tokens = vec![];
	let mut errors = vec![];

	for result in lexer {
		match result {
			Ok(token) => tokens.push(token),
			Err(err) => errors.push(err),
		}
	}

	tracing::debug!(tokens = tokens.len(), errors = errors.len(), "scanned source");

	if errors.is_empty() {
		Ok(tokens)
	} else {
		Err(errors)
	}
}
