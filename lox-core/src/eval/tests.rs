use std::{path::PathBuf, rc::Rc};

use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::Value,
    eval::prelude::{run, run_file, Interpreter, InterpreterConfig, RuntimeError, RuntimeErrorType},
    parser::prelude::parse_program,
    utils::prelude::{Error, NullWarningEmitterIO, VectorOutputIO}
};

fn interpreter(config: InterpreterConfig) -> (Interpreter, VectorOutputIO) {
    let output = VectorOutputIO::new();
    let interpreter = Interpreter::new(config, Rc::new(output.clone()));

    (interpreter, output)
}

fn run_lines(input: &str) -> Result<Vec<String>, Error> {
    let (mut interpreter, output) = interpreter(InterpreterConfig::default());

    run(PathBuf::from("test.lox"), input.to_string(), &mut interpreter, Rc::new(NullWarningEmitterIO))?;

    Ok(output.take())
}

fn runtime_error(input: &str) -> RuntimeError {
    match run_lines(input) {
        Err(Error::Runtime { error, .. }) => error,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn test_shadowing_does_not_leak() -> Result<(), Error> {
    let lines = run_lines("var x = 1; { var x = 2; print x; } print x;")?;

    assert_eq!(lines, vec!["2", "1"]);

    Ok(())
}

#[test]
fn test_closure_counter() -> Result<(), Error> {
    let input = r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }

        var counter = makeCounter();
        print counter();
        print counter();

        var other = makeCounter();
        print other();
    "#;

    assert_eq!(run_lines(input)?, vec!["1", "2", "1"]);

    Ok(())
}

#[test]
fn test_closures_share_captured_scope() -> Result<(), Error> {
    let input = r#"
        var get;
        var set;
        {
            var shared = "before";
            fun g() { return shared; }
            fun s(value) { shared = value; }
            get = g;
            set = s;
        }
        set("after");
        print get();
    "#;

    assert_eq!(run_lines(input)?, vec!["after"]);

    Ok(())
}

#[test]
fn test_break_leaves_only_innermost_loop() -> Result<(), Error> {
    let input = r#"
        for (var i = 0; i < 2; i = i + 1) {
            var j = 0;
            while (true) {
                {
                    if (j == 2) break;
                }
                j = j + 1;
            }
            print i + j;
        }
        print "done";
    "#;

    assert_eq!(run_lines(input)?, vec!["2", "3", "done"]);

    Ok(())
}

#[test]
fn test_return_unwinds_nested_blocks() -> Result<(), Error> {
    let input = r#"
        fun find(limit) {
            var i = 0;
            while (true) {
                {
                    if (i * i > limit) return i;
                }
                i = i + 1;
            }
        }
        fun noValue() { return; }

        print find(10);
        print noValue();
        print "after";
    "#;

    assert_eq!(run_lines(input)?, vec!["4", "nil", "after"]);

    Ok(())
}

#[test]
fn test_fibonacci() -> Result<(), Error> {
    let input = "fun fib(n) { if (n <= 1) return n; return fib(n-1) + fib(n-2); } print fib(10);";

    assert_eq!(run_lines(input)?, vec!["55"]);

    Ok(())
}

#[test]
fn test_addition_overloads() -> Result<(), Error> {
    let input = r#"
        print "a" + 1;
        print 1 + 1;
        print 1 + "1";
        print "lo" + "x";
        print 2.5 + "!";
        print true == 1;
        print nil == nil;
        print "1" != 1;
    "#;

    assert_eq!(
        run_lines(input)?,
        vec!["a1", "2", "11", "lox", "2.5!", "false", "true", "true"]
    );

    Ok(())
}

#[test]
fn test_number_rendering() -> Result<(), Error> {
    assert_eq!(run_lines("print 10 / 4; print 6 / 3; print -0.5 * 2;")?, vec!["2.500000", "2", "-1"]);

    Ok(())
}

#[test]
fn test_logical_operators_return_operands() -> Result<(), Error> {
    let input = r#"
        print nil or "default";
        print "first" or undefined;
        print false and undefined;
        print 1 and 2;
        print !nil;
    "#;

    assert_eq!(run_lines(input)?, vec!["default", "first", "false", "2", "true"]);

    Ok(())
}

#[test]
fn test_division_by_zero_operand() {
    for input in ["print 5 / 0;", "print 0 / 5;"] {
        let error = runtime_error(input);

        assert_eq!(error.error, RuntimeErrorType::DivisionByZero);
        assert_eq!(error.to_string(), "[line 1] Error: Division by 0 is not allowed.");
    }
}

#[test]
fn test_undefined_variables() {
    let error = runtime_error("print 1;\nprint missing;");

    assert_eq!(error.error, RuntimeErrorType::UndefinedVariable { name: "missing".into() });
    assert_eq!(error.line, 2);

    let error = runtime_error("{ ghost = 1; }");

    assert_eq!(error.error, RuntimeErrorType::UndefinedVariable { name: "ghost".into() });
}

#[test]
fn test_type_errors() {
    assert_eq!(runtime_error("-\"a\";").error, RuntimeErrorType::OperandMustBeNumber);
    assert_eq!(runtime_error("1 < \"2\";").error, RuntimeErrorType::OperandsMustBeNumbers);
    assert_eq!(runtime_error("true + nil;").error, RuntimeErrorType::InvalidAddition);
    assert_eq!(runtime_error("\"text\"();").error, RuntimeErrorType::NotCallable);
}

#[test]
fn test_arity_mismatch() {
    let error = runtime_error("fun pair(a, b) {}\npair(1);");

    assert_eq!(error.error, RuntimeErrorType::ArityMismatch { expected: 2, got: 1 });
    assert_eq!(error.to_string(), "[line 2] Error: Expected 2 arguments but got 1.");
}

#[test]
fn test_call_depth_limit() {
    let (mut interpreter, _) = interpreter(InterpreterConfig::default().with_max_call_depth(16));

    let input = "fun down(n) { if (n == 0) return 0; return down(n - 1); } down(15); down(16);";

    let result = run(PathBuf::new(), input.to_string(), &mut interpreter, Rc::new(NullWarningEmitterIO));

    match result {
        Err(Error::Runtime { error, .. }) => assert_eq!(error.error, RuntimeErrorType::StackOverflow),
        other => panic!("expected a stack overflow, got {other:?}"),
    }
}

#[test]
fn test_output_stops_at_runtime_error() {
    let (mut interpreter, output) = interpreter(InterpreterConfig::default());

    let result = run(PathBuf::new(), "print 1; print nope; print 2;".into(), &mut interpreter, Rc::new(NullWarningEmitterIO));

    assert!(result.is_err());
    assert_eq!(output.take(), vec!["1"]);
}

#[test]
fn test_globals_persist_between_runs() -> Result<(), Error> {
    let (mut interpreter, output) = interpreter(InterpreterConfig::default());
    let warnings = Rc::new(NullWarningEmitterIO);

    run(PathBuf::new(), "var total = 40;".into(), &mut interpreter, warnings.clone())?;
    let trailing = run(PathBuf::new(), "total = total + 2; total;".into(), &mut interpreter, warnings.clone())?;

    assert_eq!(trailing, Some(Value::Number(42.0)));

    let trailing = run(PathBuf::new(), "print total;".into(), &mut interpreter, warnings)?;

    assert_eq!(trailing, None);
    assert_eq!(output.take(), vec!["42"]);

    Ok(())
}

#[test]
fn test_clock_native() -> Result<(), Error> {
    let (mut interpreter, _) = interpreter(InterpreterConfig::default());

    let trailing = run(PathBuf::new(), "clock() > 0;".into(), &mut interpreter, Rc::new(NullWarningEmitterIO))?;

    assert_eq!(trailing, Some(Value::Boolean(true)));
    assert_eq!(run_lines("print clock; print clock() == clock;")?, vec!["<native fn>", "false"]);

    Ok(())
}

#[test]
fn test_functions_print_their_name() -> Result<(), Error> {
    assert_eq!(run_lines("fun hello() {} print hello; print hello();")?, vec!["<fn hello>", "nil"]);

    Ok(())
}

#[test]
fn test_static_errors_prevent_evaluation() {
    let (mut interpreter, output) = interpreter(InterpreterConfig::default());

    let result = run(PathBuf::new(), "print 1; break;".into(), &mut interpreter, Rc::new(NullWarningEmitterIO));

    assert!(matches!(result, Err(Error::Analyze { .. })));
    assert_eq!(output.take(), Vec::<String>::new());
}

#[test]
fn test_printed_program_behaves_the_same() -> Result<(), Error> {
    let input = r#"
        fun apply(f, x) { return f(x); }
        fun square(n) { return n * n; }
        var acc = "";
        for (var i = 1; i <= 3; i = i + 1) {
            if (i == 2) { acc = acc + "-"; } else acc = acc + apply(square, i);
        }
        print acc;
    "#;

    let printed = match parse_program(input) {
        Ok(parsed) => parsed.to_string(),
        Err(errors) => panic!("{errors:?}"),
    };

    assert_eq!(run_lines(input)?, vec!["1-9"]);
    assert_eq!(run_lines(&printed)?, run_lines(input)?);

    Ok(())
}

#[test]
fn test_runtime_diagnostic_rendering() {
    let err = run_lines("var a = 1;\nprint a / 0;").unwrap_err();

    assert_eq!(err.headlines(), vec!["[line 2] Error: Division by 0 is not allowed."]);
    assert!(err.pretty_string().contains("[line 2] Runtime error: Division by 0 is not allowed."));
}

#[test]
fn test_run_file_streams_source() -> Result<(), Error> {
    let path = std::env::temp_dir().join(format!("lox-core-run-file-{}.lox", std::process::id()));
    std::fs::write(&path, "var greeting = \"héllo\";\nprint greeting + \" \" + 2;\ngreeting;").unwrap();

    let (mut interpreter, output) = interpreter(InterpreterConfig::default());
    let result = run_file(path.clone(), &mut interpreter, Rc::new(NullWarningEmitterIO));

    let _ = std::fs::remove_file(&path);

    assert_eq!(result?, Some(Value::from("héllo")));
    assert_eq!(output.take(), vec!["héllo 2"]);

    Ok(())
}

#[test]
fn test_run_file_missing_path() {
    let (mut interpreter, _) = interpreter(InterpreterConfig::default());

    let result = run_file(PathBuf::from("/definitely/not/here.lox"), &mut interpreter, Rc::new(NullWarningEmitterIO));

    assert_eq!(result, Err(Error::StdIo { err: std::io::ErrorKind::NotFound }));
}

#[test]
fn test_deeply_nested_program_runs() {
    let depth = 10_000;
    let input = format!(
        "print {}1{}; print {}2;",
        "(".repeat(depth),
        ")".repeat(depth),
        "-".repeat(depth)
    );

    // A fixed 8 MiB thread, so nesting depth is what gets tested.
    let lines = std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(move || run_lines(&input).map_err(|err| err.pretty_string()))
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(lines, Ok(vec!["1".to_string(), "2".to_string()]));
}
