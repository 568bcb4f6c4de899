use pretty_assertions::assert_eq;

use super::prelude::{scan, Lexer, LexicalErrorType, Literal, TokenKind};

fn kinds(src: &str) -> Vec<TokenKind> {
    scan(src)
        .expect("source should scan")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_operators() {
    let input = "( ) { } , . - + ; / * ! != = == < <= > >=";

    assert_eq!(kinds(input), vec![
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::Comma,
        TokenKind::Dot,
        TokenKind::Minus,
        TokenKind::Plus,
        TokenKind::Semicolon,
        TokenKind::Slash,
        TokenKind::Star,
        TokenKind::Bang,
        TokenKind::BangEqual,
        TokenKind::Equal,
        TokenKind::EqualEqual,
        TokenKind::Less,
        TokenKind::LessEqual,
        TokenKind::Greater,
        TokenKind::GreaterEqual,
        TokenKind::Eof,
    ]);
}

#[test]
fn test_maximal_munch_without_spaces() {
    assert_eq!(kinds("!==<=>="), vec![
        TokenKind::BangEqual,
        TokenKind::Equal,
        TokenKind::LessEqual,
        TokenKind::GreaterEqual,
        TokenKind::Eof,
    ]);
}

#[test]
fn test_keywords_and_identifiers() {
    let input = "and break class else false for fun if nil or print return super this true var while _under score9 fortune";

    assert_eq!(kinds(input), vec![
        TokenKind::And,
        TokenKind::Break,
        TokenKind::Class,
        TokenKind::Else,
        TokenKind::False,
        TokenKind::For,
        TokenKind::Fun,
        TokenKind::If,
        TokenKind::Nil,
        TokenKind::Or,
        TokenKind::Print,
        TokenKind::Return,
        TokenKind::Super,
        TokenKind::This,
        TokenKind::True,
        TokenKind::Var,
        TokenKind::While,
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::Eof,
    ]);
}

#[test]
fn test_numbers() {
    let tokens = scan("10 1.5 0.25 7.").unwrap();

    let literals = tokens.iter()
        .filter_map(|token| token.literal.clone())
        .collect::<Vec<_>>();

    assert_eq!(literals, vec![
        Literal::Number(10.0),
        Literal::Number(1.5),
        Literal::Number(0.25),
        Literal::Number(7.0),
    ]);

    // A trailing dot is not part of the number.
    assert_eq!(tokens[3].lexeme, "7");
    assert_eq!(tokens[4].kind, TokenKind::Dot);
}

#[test]
fn test_leading_dot_is_not_a_number() {
    assert_eq!(kinds(".5"), vec![TokenKind::Dot, TokenKind::Number, TokenKind::Eof]);
}

#[test]
fn test_strings_keep_newlines_and_count_lines() {
    let tokens = scan("\"one\ntwo\" x").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].lexeme, "\"one\ntwo\"");
    assert_eq!(tokens[0].literal, Some(Literal::String("one\ntwo".into())));
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn test_comments_are_discarded() {
    let input = r#"
        // line comment print
        var /* inline */ a = 1; /* spans
        two lines */ print a;
    "#;

    let tokens = scan(input).unwrap();

    assert_eq!(
        tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Print,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[5].line, 4);
}

#[test]
fn test_block_comment_needs_both_closing_chars() {
    // A lone `*` or `/` inside the comment does not end it.
    assert_eq!(kinds("/* a * b / c */ 1"), vec![TokenKind::Number, TokenKind::Eof]);
}

#[test]
fn test_unterminated_block_comment() {
    let errors = scan("1 /* never closed").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, LexicalErrorType::UnterminatedComment);
}

#[test]
fn test_unterminated_string() {
    let errors = scan("print \"abc\n").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, LexicalErrorType::UnterminatedString);
    assert_eq!(errors[0].line, 2);
}

#[test]
fn test_errors_accumulate() {
    let errors = scan("var a = 1 @ 2;\nprint # a;").unwrap_err();

    assert_eq!(
        errors.iter().map(|err| (err.error, err.line)).collect::<Vec<_>>(),
        vec![
            (LexicalErrorType::UnrecognizedCharacter { ch: '@' }, 1),
            (LexicalErrorType::UnrecognizedCharacter { ch: '#' }, 2),
        ]
    );
}

#[test]
fn test_lexer_stops_after_eof() {
    let mut lexer = Lexer::new("a".char_indices().map(|(i, c)| (i as u32, c)));

    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Identifier);
    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Eof);
    assert!(lexer.next().is_none());
}

#[test]
fn test_spans_track_byte_offsets() {
    let errors = scan("var école = 1;").unwrap_err();

    // Non-ASCII letters are not identifier characters.
    assert_eq!(errors[0].error, LexicalErrorType::UnrecognizedCharacter { ch: 'é' });
    assert_eq!(errors[0].location.start, 4);
    assert_eq!(errors[0].location.end, 6);
}

#[test]
fn test_token_spans_cover_their_lexemes() {
    let src = "print \"hé\" >= 10.5;";
    let tokens = scan(src).expect("source should scan");

    let spans = tokens.iter()
        .filter(|token| token.kind != TokenKind::Eof)
        .map(|token| (token.span.start, token.span.end))
        .collect::<Vec<_>>();

    assert_eq!(spans, vec![(0, 5), (6, 11), (12, 14), (15, 19), (19, 20)]);

    for token in tokens.iter().filter(|token| token.kind != TokenKind::Eof) {
        assert_eq!(&src[token.span.start as usize..token.span.end as usize], token.lexeme);
    }
}
