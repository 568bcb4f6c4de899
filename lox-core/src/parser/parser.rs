use std::rc::Rc;

use crate::{
    lexer::prelude::{LexResult, LexicalError, Lexer, Token, TokenKind},
    utils::prelude::{ensure_sufficient_stack, SrcSpan}
};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Expr, FunctionDecl, Parsed, Primitive, Stmt};

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over a stream of lexer results.
///
/// Syntax errors are recorded and the parser resynchronises at the next
/// statement boundary, so a single pass reports every independent error.
/// Lexical errors pulled from the stream are recorded alongside them.
pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Token,
    pub errors: Vec<ParseError>,
    pub lex_errors: Vec<LexicalError>,

    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: Token::new(TokenKind::Eof, "", 1, SrcSpan::default()),
            errors: vec![],
            lex_errors: vec![],

            tokens: input,
        };

        if let Some(token) = parser.pull() {
            parser.current_token = token;
        }

        parser
    }

    // Next token from the stream, recording lexical errors on the way.
    fn pull(&mut self) -> Option<Token> {
        loop {
            match self.tokens.next()? {
                Ok(token) => return Some(token),
                Err(err) => self.lex_errors.push(err),
            }
        }
    }

    pub fn parse(&mut self) -> Result<Parsed, Vec<ParseError>> {
        let mut statements = vec![];

        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        let mut errors = self.lex_errors.drain(..)
            .map(ParseError::from)
            .chain(self.errors.drain(..))
            .collect::<Vec<ParseError>>();

        errors.sort_by_key(|err| err.span.start);

        tracing::debug!(statements = statements.len(), errors = errors.len(), "parsed program");

        if errors.is_empty() {
            Ok(Parsed { statements })
        } else {
            Err(errors)
        }
    }

    fn is_at_end(&self) -> bool {
        self.current_token.is(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.is(kind)
    }

    fn advance(&mut self) -> Token {
        if self.is_at_end() {
            return self.current_token.clone();
        }

        let next = self.pull()
            .unwrap_or_else(|| self.current_token.clone());

        std::mem::replace(&mut self.current_token, next)
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.iter().any(|kind| self.check(*kind)) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn expect_one(&mut self, kind: TokenKind, message: &'static str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(ParseError::at(
            &self.current_token,
            ParseErrorType::ExpectedToken { message }
        ))
    }

    // Discards tokens up to a likely statement boundary.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.advance().is(TokenKind::Semicolon) {
                return;
            }

            if self.current_token.kind.starts_statement() {
                return;
            }
        }
    }

    // declaration -> var_declaration | statement
    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.check(TokenKind::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(statement) => Some(statement),
            Err(err) => {
                self.errors.push(err);
                self.synchronize();

                None
            }
        }
    }

    // var_declaration -> "var" IDENTIFIER ( "=" expression )? ";"
    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        self.advance();

        let name = self.expect_one(TokenKind::Identifier, "Expect variable name.")?;

        let initializer = match self.match_any(&[TokenKind::Equal]) {
            Some(_) => Some(self.expression()?),
            None => None,
        };

        self.expect_one(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> ParseResult<Stmt> {
        match self.current_token.kind {
            TokenKind::For => self.for_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::Print => self.print_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::LeftBrace => self.block_statement(),
            TokenKind::Fun => self.function(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Break => self.break_statement(),
            TokenKind::Class => Err(ParseError::at(
                &self.current_token,
                ParseErrorType::UnsupportedClass
            )),
            _ => self.expression_statement(),
        }
    }

    // for -> "for" "(" ( var_declaration | expression_statement | ";" )
    //        expression? ";" expression? ")" statement
    //
    // Desugared into `{ initializer; while (condition) { body; increment; } }`.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();

        self.expect_one(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = match self.current_token.kind {
            TokenKind::Semicolon => {
                self.advance();
                None
            },
            TokenKind::Var => Some(self.var_declaration()?),
            _ => Some(self.expression_statement()?),
        };

        let condition = match self.check(TokenKind::Semicolon) {
            true => None,
            false => Some(self.expression()?),
        };

        self.expect_one(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = match self.check(TokenKind::RightParen) {
            true => None,
            false => Some(self.expression()?),
        };

        self.expect_one(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            let location = body.location().to(increment.location());

            body = Stmt::Block {
                statements: vec![body, Stmt::Expression { expression: increment }],
                location,
            };
        }

        let condition = condition.unwrap_or_else(|| Expr::Literal {
            value: Primitive::Bool(true),
            line: keyword.line,
            location: keyword.span,
        });

        let location = keyword.span.to(body.location());

        let while_loop = Stmt::While {
            keyword,
            condition,
            body: Box::new(body),
        };

        Ok(match initializer {
            Some(initializer) => Stmt::Block {
                statements: vec![initializer, while_loop],
                location,
            },
            None => while_loop,
        })
    }

    // if -> "if" "(" expression ")" statement ( "else" statement )?
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();

        self.expect_one(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.expect_one(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);

        let else_branch = match self.match_any(&[TokenKind::Else]) {
            Some(_) => Some(Box::new(self.statement()?)),
            None => None,
        };

        Ok(Stmt::If { keyword, condition, then_branch, else_branch })
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        let expression = self.expression()?;

        self.expect_one(TokenKind::Semicolon, "Expect ';' after value.")?;

        Ok(Stmt::Print { keyword, expression })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();

        self.expect_one(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.expect_one(TokenKind::RightParen, "Expect ')' after condition.")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::While { keyword, condition, body })
    }

    fn block_statement(&mut self) -> ParseResult<Stmt> {
        let open = self.advance();
        let (statements, close) = self.block()?;

        Ok(Stmt::Block {
            statements,
            location: open.span.to(close.span),
        })
    }

    // block -> declaration* "}"   (the opening brace is already consumed)
    fn block(&mut self) -> ParseResult<(Vec<Stmt>, Token)> {
        let mut statements = vec![];

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        let close = self.expect_one(TokenKind::RightBrace, "Expect '}' after block.")?;

        Ok((statements, close))
    }

    // function -> "fun" IDENTIFIER "(" parameters? ")" block
    fn function(&mut self) -> ParseResult<Stmt> {
        self.advance();

        let name = self.expect_one(TokenKind::Identifier, "Expect function name.")?;

        self.expect_one(TokenKind::LeftParen, "Expect '(' after function name.")?;

        let mut params = vec![];

        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.expect_one(TokenKind::Identifier, "Expect parameter name.")?);

                if self.match_any(&[TokenKind::Comma]).is_none() {
                    break;
                }
            }
        }

        self.expect_one(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.expect_one(TokenKind::LeftBrace, "Expect '{' before function body.")?;

        let (body, _) = self.block()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();

        let value = match self.check(TokenKind::Semicolon) {
            true => None,
            false => Some(self.expression()?),
        };

        self.expect_one(TokenKind::Semicolon, "Expect ';' after return value.")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();

        self.expect_one(TokenKind::Semicolon, "Expect ';' after 'break'.")?;

        Ok(Stmt::Break { keyword })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;

        self.expect_one(TokenKind::Semicolon, "Expect ';' after expression.")?;

        Ok(Stmt::Expression { expression })
    }

    pub fn expression(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| self.assignment())
    }

    // assignment -> IDENTIFIER "=" assignment | logic_or
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logic_or()?;

        let equals = match self.match_any(&[TokenKind::Equal]) {
            Some(equals) => equals,
            None => return Ok(expr),
        };

        let value = self.assignment()?;

        match expr {
            Expr::Variable { name } => Ok(Expr::Assign { name, value: Box::new(value) }),
            expr => {
                // Reported without unwinding: the statement itself is still well formed.
                self.errors.push(ParseError::at(&equals, ParseErrorType::InvalidAssignmentTarget));

                Ok(expr)
            }
        }
    }

    fn logic_or(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::Or], Self::logic_and, logical)
    }

    fn logic_and(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::And], Self::equality, logical)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.left_associative(
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::comparison,
            binary
        )
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.left_associative(
            &[TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::Less, TokenKind::LessEqual],
            Self::term,
            binary
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::Minus, TokenKind::Plus], Self::factor, binary)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::Slash, TokenKind::Star], Self::unary, binary)
    }

    fn left_associative(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr>,
        build: fn(Expr, Token, Expr) -> Expr,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while let Some(operator) = self.match_any(operators) {
            let right = operand(self)?;

            expr = build(expr, operator, right);
        }

        Ok(expr)
    }

    // unary -> ( "!" | "-" ) unary | call
    fn unary(&mut self) -> ParseResult<Expr> {
        match self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            Some(operator) => {
                let right = ensure_sufficient_stack(|| self.unary())?;

                Ok(Expr::Unary { operator, right: Box::new(right) })
            },
            None => self.call(),
        }
    }

    // call -> primary ( "(" arguments? ")" )*
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        while self.match_any(&[TokenKind::LeftParen]).is_some() {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(TokenKind::RightParen) {
            loop {
                arguments.push(self.expression()?);

                if self.match_any(&[TokenKind::Comma]).is_none() {
                    break;
                }
            }
        }

        let paren = self.expect_one(TokenKind::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    // primary -> "true" | "false" | "nil" | NUMBER | STRING | IDENTIFIER | "(" expression ")"
    fn primary(&mut self) -> ParseResult<Expr> {
        let token = &self.current_token;

        let value = match (token.kind, &token.literal) {
            (TokenKind::False, _) => Some(Primitive::Bool(false)),
            (TokenKind::True, _) => Some(Primitive::Bool(true)),
            (TokenKind::Nil, _) => Some(Primitive::Nil),
            (TokenKind::Number | TokenKind::String, Some(literal)) => Some(Primitive::from(literal)),
            _ => None,
        };

        if let Some(value) = value {
            let token = self.advance();

            return Ok(Expr::Literal {
                value,
                line: token.line,
                location: token.span,
            });
        }

        match self.current_token.kind {
            TokenKind::Identifier => Ok(Expr::Variable { name: self.advance() }),
            TokenKind::LeftParen => {
                let open = self.advance();
                let expression = self.expression()?;
                let close = self.expect_one(TokenKind::RightParen, "Expect ')' after expression.")?;

                Ok(Expr::Grouping {
                    expression: Box::new(expression),
                    location: open.span.to(close.span),
                })
            },
            _ => Err(ParseError::at(&self.current_token, ParseErrorType::ExpectedExpression)),
        }
    }
}

fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
    Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
}

fn logical(left: Expr, operator: Token, right: Expr) -> Expr {
    Expr::Logical { left: Box::new(left), operator, right: Box::new(right) }
}

pub fn parse_program(src: &str) -> Result<Parsed, Vec<ParseError>> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_program_from_stream(stream: impl Iterator<Item = char>) -> Result<Parsed, Vec<ParseError>> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);

    parser.parse()
}
