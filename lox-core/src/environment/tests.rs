use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Environment, Value},
    eval::prelude::RuntimeErrorType,
    lexer::prelude::{Literal, Token, TokenKind},
    utils::prelude::SrcSpan
};

fn ident(name: &str, line: u32) -> Token {
    Token::new(TokenKind::Identifier, name, line, SrcSpan::from(0, name.len() as u32))
}

#[test]
fn test_lookup_walks_outward() {
    let globals = Environment::new_ref();
    globals.borrow_mut().define("a", Value::Number(1.0));

    let inner = Environment::with_enclosing(globals.clone());
    inner.borrow_mut().define("b", Value::from("two"));

    assert_eq!(inner.borrow().get(&ident("a", 1)), Ok(Value::Number(1.0)));
    assert_eq!(inner.borrow().get(&ident("b", 1)), Ok(Value::from("two")));
    assert_eq!(inner.borrow().depth(), 1);

    let err = globals.borrow().get(&ident("b", 3)).unwrap_err();

    assert_eq!(err.error, RuntimeErrorType::UndefinedVariable { name: "b".into() });
    assert_eq!(err.line, 3);
    assert_eq!(err.to_string(), "[line 3] Error: Undefined variable 'b'.");
}

#[test]
fn test_shadowing_does_not_touch_outer() {
    let globals = Environment::new_ref();
    globals.borrow_mut().define("x", Value::Number(1.0));

    let inner = Environment::with_enclosing(globals.clone());
    inner.borrow_mut().define("x", Value::Number(2.0));

    assert_eq!(inner.borrow().get(&ident("x", 1)), Ok(Value::Number(2.0)));
    assert_eq!(globals.borrow().get(&ident("x", 1)), Ok(Value::Number(1.0)));

    // Redefinition in the same scope overwrites.
    globals.borrow_mut().define("x", Value::Nil);
    assert_eq!(globals.borrow().get(&ident("x", 1)), Ok(Value::Nil));
}

#[test]
fn test_assign_updates_nearest_binding() {
    let globals = Environment::new_ref();
    globals.borrow_mut().define("count", Value::Number(0.0));

    let inner = Environment::with_enclosing(globals.clone());

    inner.borrow_mut().assign(&ident("count", 1), Value::Number(5.0)).unwrap();

    assert_eq!(globals.borrow().get(&ident("count", 1)), Ok(Value::Number(5.0)));
    assert!(inner.borrow().store.is_empty());
}

#[test]
fn test_assign_never_creates_a_binding() {
    let globals = Environment::new_ref();
    let inner = Environment::with_enclosing(globals.clone());

    let err = inner.borrow_mut().assign(&ident("ghost", 7), Value::Nil).unwrap_err();

    assert_eq!(err.error, RuntimeErrorType::UndefinedVariable { name: "ghost".into() });
    assert!(globals.borrow().store.is_empty());
}

#[test]
fn test_truthiness() {
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::Boolean(false).is_truthy());
    assert!(Value::Boolean(true).is_truthy());
    assert!(Value::Number(0.0).is_truthy());
    assert!(Value::from("").is_truthy());
}

#[test]
fn test_equality_across_types_is_false() {
    assert_eq!(Value::Nil, Value::Nil);
    assert_ne!(Value::from(true), Value::from(1.0));
    assert_ne!(Value::from("1"), Value::Number(1.0));
    assert_ne!(Value::Nil, Value::Boolean(false));
    assert_eq!(Value::from("lox"), Value::from(&Literal::String("lox".into())));
}

#[test]
fn test_print_rendering_trims_only_exact_zero_fraction() {
    assert_eq!(Value::Number(3.0).print_string(), "3");
    assert_eq!(Value::Number(-12.0).print_string(), "-12");
    assert_eq!(Value::Number(2.5).print_string(), "2.500000");
    assert_eq!(Value::Number(0.1 + 0.2).print_string(), "0.300000");
    assert_eq!(Value::Nil.print_string(), "nil");
    assert_eq!(Value::from("raw text").print_string(), "raw text");

    // Concatenation uses the shortest form instead.
    assert_eq!(Value::Number(2.5).to_string(), "2.5");
    assert_eq!(Value::Number(3.0).to_string(), "3");
}

#[test]
fn test_concatenation_rendering_switches_to_exponent_form() {
    assert_eq!(Value::Number(1e20).to_string(), "100000000000000000000");
    assert_eq!(Value::Number(1e21).to_string(), "1e+21");
    assert_eq!(Value::Number(-1.5e300).to_string(), "-1.5e+300");
    assert_eq!(Value::Number(0.0001).to_string(), "0.0001");
    assert_eq!(Value::Number(0.00001).to_string(), "1e-05");
    assert_eq!(Value::Number(0.0).to_string(), "0");
    assert_eq!(Value::Number(f64::INFINITY).to_string(), "+Inf");
    assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Inf");
}
