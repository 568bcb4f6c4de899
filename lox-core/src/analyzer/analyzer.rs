use std::collections::HashMap;

use crate::{
    analyzer::prelude::{AnalyzeError, Problems, Warning},
    lexer::prelude::Token,
    parser::prelude::{Expr, FunctionDecl, Parsed, Stmt},
    utils::prelude::{ensure_sufficient_stack, ProgramWarningEmitter, SrcSpan}
};

pub enum Outcome<T, E> {
    Ok(T),
    PartialFailure(T, E)
}

// Where the statement being checked sits: `return` needs a function,
// `break` needs a loop that is not behind a function boundary.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    in_function: bool,
    in_loop: bool,
}

#[derive(Debug, Clone)]
struct Local {
    location: SrcSpan,
    used: bool,
}

/// Control-flow and usage checks run between parsing and evaluation.
///
/// Errors make the program invalid; warnings are emitted as they are found and
/// never stop evaluation. Globals are not tracked for usage since a later
/// REPL line may still read them.
#[derive(Debug, Default)]
pub struct ProgramAnalyzer {
    problems: Problems,
    scopes: Vec<HashMap<String, Local>>,
}

impl ProgramAnalyzer {
    pub fn analyze(
        parsed: Parsed,
        warnings: &ProgramWarningEmitter
    ) -> Outcome<Parsed, Vec<AnalyzeError>> {
        let mut analyzer = ProgramAnalyzer::default();

        analyzer.analyze_sequence(&parsed.statements, Context::default());

        analyzer.problems.sort();

        for warning in analyzer.problems.take_warnings() {
            warnings.emit(warning);
        }

        let errors = analyzer.problems.take_errors();

        tracing::debug!(errors = errors.len(), "analyzed program");

        if errors.is_empty() {
            Outcome::Ok(parsed)
        } else {
            Outcome::PartialFailure(parsed, errors)
        }
    }

    fn analyze_sequence(&mut self, statements: &[Stmt], context: Context) {
        let mut exited = false;

        for (idx, statement) in statements.iter().enumerate() {
            self.analyze_statement(statement, context);

            if !exited && always_exits(statement) && idx + 1 < statements.len() {
                exited = true;

                let rest = &statements[idx + 1..];
                let location = rest[0].location().to(rest[rest.len() - 1].location());

                self.problems.warning(Warning::UnreachableCode { location });
            }
        }
    }

    fn analyze_statement(&mut self, statement: &Stmt, context: Context) {
        ensure_sufficient_stack(|| self.analyze_statement_inner(statement, context))
    }

    fn analyze_statement_inner(&mut self, statement: &Stmt, context: Context) {
        match statement {
            Stmt::Expression { expression }
            | Stmt::Print { expression, .. } => self.analyze_expression(expression),
            Stmt::Var { name, initializer } => {
                if let Some(initializer) = initializer {
                    self.analyze_expression(initializer);
                }

                self.declare(name);
            },
            Stmt::Block { statements, .. } => {
                self.scoped(|analyzer| analyzer.analyze_sequence(statements, context));
            },
            Stmt::If { condition, then_branch, else_branch, .. } => {
                self.analyze_expression(condition);
                self.analyze_statement(then_branch, context);

                if let Some(else_branch) = else_branch {
                    self.analyze_statement(else_branch, context);
                }

                match condition.as_constant_bool() {
                    Some(true) => {
                        if let Some(else_branch) = else_branch {
                            self.problems.warning(Warning::UnreachableElseClause { location: else_branch.location() });
                        }
                    },
                    Some(false) => {
                        self.problems.warning(Warning::UnreachableIfClause { location: then_branch.location() });
                    },
                    None => {}
                }
            },
            Stmt::While { keyword, condition, body } => {
                self.analyze_expression(condition);
                self.analyze_statement(body, Context { in_loop: true, ..context });

                match condition.as_constant_bool() {
                    Some(true) if !can_leave_loop(body) => {
                        let location = keyword.span.to(condition.location());

                        self.problems.warning(Warning::InfiniteLoop { location });
                    },
                    Some(false) => {
                        self.problems.warning(Warning::UnreachableWhileClause { location: body.location() });
                    },
                    _ => {}
                }
            },
            Stmt::Function(declaration) => self.analyze_function(declaration),
            Stmt::Return { keyword, value } => {
                if let Some(value) = value {
                    self.analyze_expression(value);
                }

                if !context.in_function {
                    self.problems.error(AnalyzeError::ReturnOutsideFunction {
                        location: statement.location(),
                        line: keyword.line,
                    });
                }
            },
            Stmt::Break { keyword } => {
                if !context.in_loop {
                    self.problems.error(AnalyzeError::BreakOutsideLoop {
                        location: keyword.span,
                        line: keyword.line,
                    });
                }
            },
        }
    }

    fn analyze_function(&mut self, declaration: &FunctionDecl) {
        tracing::trace!(function = %declaration.name.lexeme, "analyzing function");

        let context = Context { in_function: true, in_loop: false };

        self.scoped(|analyzer| {
            // Parameters are bound but not tracked: an unused parameter is not a mistake.
            analyzer.analyze_sequence(&declaration.body, context);
        });
    }

    fn analyze_expression(&mut self, expression: &Expr) {
        ensure_sufficient_stack(|| self.analyze_expression_inner(expression))
    }

    fn analyze_expression_inner(&mut self, expression: &Expr) {
        match expression {
            Expr::Literal { .. } => {},
            Expr::Grouping { expression, .. }
            | Expr::Unary { right: expression, .. } => self.analyze_expression(expression),
            Expr::Binary { left, right, .. }
            | Expr::Logical { left, right, .. } => {
                self.analyze_expression(left);
                self.analyze_expression(right);
            },
            Expr::Variable { name } => self.mark_used(&name.lexeme),
            Expr::Assign { value, .. } => self.analyze_expression(value),
            Expr::Call { callee, arguments, .. } => {
                self.analyze_expression(callee);

                for argument in arguments {
                    self.analyze_expression(argument);
                }
            },
        }
    }

    fn scoped(&mut self, analyze: impl FnOnce(&mut Self)) {
        self.scopes.push(HashMap::new());

        analyze(self);

        if let Some(scope) = self.scopes.pop() {
            for (name, local) in scope {
                if !local.used {
                    self.problems.warning(Warning::UnusedVariable { location: local.location, name });
                }
            }
        }
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        let shadowed = scope.insert(name.lexeme.clone(), Local { location: name.span, used: false });

        // Redeclaring in the same scope replaces the binding, so the old one is checked now.
        if let Some(Local { location, used: false }) = shadowed {
            self.problems.warning(Warning::UnusedVariable { location, name: name.lexeme.clone() });
        }
    }

    fn mark_used(&mut self, name: &str) {
        if let Some(local) = self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name)) {
            local.used = true;
        }
    }
}

/// Whether control can never fall through `statement`.
fn always_exits(statement: &Stmt) -> bool {
    match statement {
        Stmt::Return { .. } | Stmt::Break { .. } => true,
        Stmt::Block { statements, .. } => statements.iter().any(always_exits),
        Stmt::If { then_branch, else_branch: Some(else_branch), .. } => {
            always_exits(then_branch) && always_exits(else_branch)
        },
        _ => false,
    }
}

/// Whether `body` contains a `break` or `return` that leaves the loop it belongs to.
fn can_leave_loop(body: &Stmt) -> bool {
    match body {
        Stmt::Return { .. } | Stmt::Break { .. } => true,
        Stmt::Block { statements, .. } => statements.iter().any(can_leave_loop),
        Stmt::If { then_branch, else_branch, .. } => {
            can_leave_loop(then_branch) || else_branch.as_deref().is_some_and(can_leave_loop)
        },
        // A nested loop keeps its own `break`, but a `return` still leaves ours.
        Stmt::While { body, .. } => contains_return(body),
        _ => false,
    }
}

fn contains_return(statement: &Stmt) -> bool {
    match statement {
        Stmt::Return { .. } => true,
        Stmt::Block { statements, .. } => statements.iter().any(contains_return),
        Stmt::If { then_branch, else_branch, .. } => {
            contains_return(then_branch) || else_branch.as_deref().is_some_and(contains_return)
        },
        Stmt::While { body, .. } => contains_return(body),
        _ => false,
    }
}
