use std::{path::PathBuf, rc::Rc};

use pretty_assertions::assert_eq;

use crate::{
    analyzer::{analyze_source, prelude::{AnalyzeError, Warning as AnalyzerWarning}},
    utils::prelude::{Error, VectorWarningEmitterIO, Warning}
};

fn check(input: &str) -> (Result<(), Vec<AnalyzeError>>, Vec<AnalyzerWarning>) {
    let warnings = Rc::new(VectorWarningEmitterIO::new());

    let result = match analyze_source(PathBuf::from("test.lox"), input.to_string(), warnings.clone()) {
        Ok(_) => Ok(()),
        Err(Error::Analyze { errors, .. }) => Err(errors),
        Err(err) => panic!("unexpected front-end failure: {err:?}"),
    };

    let warnings = warnings.take()
        .into_iter()
        .map(|Warning::Program { warning, .. }| warning)
        .collect();

    (result, warnings)
}

fn warning_names(warnings: &[AnalyzerWarning]) -> Vec<&'static str> {
    warnings.iter()
        .map(|warning| match warning {
            AnalyzerWarning::UnusedVariable { .. } => "unused",
            AnalyzerWarning::UnreachableIfClause { .. } => "if",
            AnalyzerWarning::UnreachableElseClause { .. } => "else",
            AnalyzerWarning::InfiniteLoop { .. } => "infinite",
            AnalyzerWarning::UnreachableWhileClause { .. } => "while",
            AnalyzerWarning::UnreachableCode { .. } => "unreachable",
        })
        .collect()
}

#[test]
fn test_clean_program() {
    let input = r#"
        fun fib(n) {
            if (n <= 1) return n;
            return fib(n - 1) + fib(n - 2);
        }

        for (var i = 0; i < 3; i = i + 1) {
            if (i == 1) break;
            print fib(i);
        }
    "#;

    let (result, warnings) = check(input);

    assert_eq!(result, Ok(()));
    assert_eq!(warnings, vec![]);
}

#[test]
fn test_return_outside_function() {
    let (result, _) = check("print 1;\nreturn 2;");

    let errors = result.unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "[line 2] Error: Can't return from top-level code.");
}

#[test]
fn test_break_outside_loop() {
    let input = r#"
        break;
        while (true) {
            fun inner() {
                break;
            }
            break;
        }
    "#;

    let (result, _) = check(input);
    let errors = result.unwrap_err();
    let lines = errors.iter().map(|err| err.line()).collect::<Vec<u32>>();

    // The loop does not reach into the function body.
    assert_eq!(lines, vec![2, 5]);
    assert!(errors.iter().all(|err| matches!(err, AnalyzeError::BreakOutsideLoop { .. })));
}

#[test]
fn test_unreachable_code_after_return() {
    let input = r#"
        fun f() {
            return 1;
            print "never";
            print "again";
        }
    "#;

    let (result, warnings) = check(input);

    assert_eq!(result, Ok(()));
    assert_eq!(warning_names(&warnings), vec!["unreachable"]);

    let AnalyzerWarning::UnreachableCode { location } = &warnings[0] else {
        unreachable!();
    };

    assert_eq!(&input[location.start as usize..location.end as usize], "print \"never\";\n            print \"again\"");
}

#[test]
fn test_unused_locals() {
    let input = r#"
        var global = 1;
        {
            var used = 1;
            var unused = 2;
            print used;
        }
    "#;

    let (_, warnings) = check(input);

    assert_eq!(warnings, vec![AnalyzerWarning::UnusedVariable {
        location: warnings[0].location(),
        name: "unused".to_string(),
    }]);
}

#[test]
fn test_closure_reads_count_as_use() {
    let input = r#"
        fun counter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
    "#;

    let (result, warnings) = check(input);

    assert_eq!(result, Ok(()));
    assert_eq!(warnings, vec![]);
}

#[test]
fn test_constant_conditions() {
    let input = r#"
        if (true) print 1; else print 2;
        if (false) print 3;
        while (false) print 4;
        while (true) print 5;
        while ((true)) { if (1 > 2) break; }
    "#;

    let (result, warnings) = check(input);

    assert_eq!(result, Ok(()));
    assert_eq!(warning_names(&warnings), vec!["else", "if", "while", "infinite"]);
}

#[test]
fn test_nested_loop_break_does_not_end_outer_loop() {
    let input = r#"
        fun f() {
            while (true) {
                while (true) { break; }
            }
        }
        fun g() {
            while (true) {
                while (true) { return 1; }
            }
        }
    "#;

    let (_, warnings) = check(input);

    assert_eq!(warning_names(&warnings), vec!["infinite"]);
    assert!(warnings[0].location().start < input.find("fun g").unwrap() as u32);
}

#[test]
fn test_parse_errors_stop_before_analysis() {
    let warnings = Rc::new(VectorWarningEmitterIO::new());

    let result = analyze_source(PathBuf::new(), "return".to_string(), warnings);

    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[test]
fn test_warning_diagnostic_names_the_line() {
    let warnings = Rc::new(VectorWarningEmitterIO::new());

    let _ = analyze_source(PathBuf::from("w.lox"), "\n{ var x; }".to_string(), warnings.clone());

    let rendered = warnings.take()[0].pretty_string();

    assert!(rendered.contains("[line 2] Unused variable 'x'"), "{rendered}");
}
