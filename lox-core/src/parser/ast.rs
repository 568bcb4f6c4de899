use std::{fmt::Display, rc::Rc};

use crate::{lexer::prelude::{Literal, Token}, utils::prelude::{ensure_sufficient_stack, SrcSpan}};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub statements: Vec<Stmt>,
}

impl Display for Parsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("\n"))
    }
}

// primitive -> "nil" | "true" | "false" | NUMBER | STRING
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
}

impl From<&Literal> for Primitive {
    fn from(value: &Literal) -> Self {
        match value {
            Literal::Number(value) => Self::Number(*value),
            Literal::String(value) => Self::String(value.clone()),
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "\"{value}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Primitive,
        line: u32,
        location: SrcSpan,
    },
    Grouping {
        expression: Box<Expr>,
        location: SrcSpan,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    // `and` / `or`, evaluated with short-circuiting
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        // closing paren, for error lines
        paren: Token,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Literal { location, .. }
            | Self::Grouping { location, .. } => *location,
            Self::Unary { operator, right } => operator.span.to(right.location()),
            Self::Binary { left, right, .. }
            | Self::Logical { left, right, .. } => left.location().to(right.location()),
            Self::Variable { name } => name.span,
            Self::Assign { name, value } => name.span.to(value.location()),
            Self::Call { callee, paren, .. } => callee.location().to(paren.span),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::Literal { line, .. } => *line,
            Self::Grouping { expression, .. } => expression.line(),
            Self::Unary { operator, .. }
            | Self::Binary { operator, .. }
            | Self::Logical { operator, .. } => operator.line,
            Self::Variable { name }
            | Self::Assign { name, .. } => name.line,
            Self::Call { paren, .. } => paren.line,
        }
    }

    /// Literal truth value of the condition, when it is a bare `true`/`false`.
    pub fn as_constant_bool(&self) -> Option<bool> {
        match self {
            Self::Literal { value: Primitive::Bool(value), .. } => Some(*value),
            Self::Grouping { expression, .. } => expression.as_constant_bool(),
            _ => None,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ensure_sufficient_stack(|| match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Grouping { expression, .. } => write!(f, "({expression})"),
            Self::Unary { operator, right } => write!(f, "{}{right}", operator.lexeme),
            Self::Binary { left, operator, right }
            | Self::Logical { left, operator, right } => {
                write!(f, "{left} {} {right}", operator.lexeme)
            },
            Self::Variable { name } => write!(f, "{}", name.lexeme),
            Self::Assign { name, value } => write!(f, "{} = {value}", name.lexeme),
            Self::Call { callee, arguments, .. } => {
                let arguments = arguments.iter()
                    .map(|argument| argument.to_string())
                    .collect::<Vec<String>>();

                write!(f, "{callee}({})", arguments.join(", "))
            }
        })
    }
}

// function -> IDENTIFIER "(" parameters? ")" block
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

impl Display for FunctionDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter()
            .map(|param| param.lexeme.as_str())
            .collect::<Vec<&str>>();

        write!(f, "fun {}({}) {}", self.name.lexeme, params.join(", "), Block(&self.body))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression {
        expression: Expr,
    },
    Print {
        keyword: Token,
        expression: Expr,
    },
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
    Block {
        statements: Vec<Stmt>,
        location: SrcSpan,
    },
    If {
        keyword: Token,
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        keyword: Token,
        condition: Expr,
        body: Box<Stmt>,
    },
    // Shared with every closure created from this declaration.
    Function(Rc<FunctionDecl>),
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
    Break {
        keyword: Token,
    },
}

impl Stmt {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Expression { expression } => expression.location(),
            Self::Print { keyword, expression } => keyword.span.to(expression.location()),
            Self::Var { name, initializer } => match initializer {
                Some(initializer) => name.span.to(initializer.location()),
                None => name.span,
            },
            Self::Block { location, .. } => *location,
            Self::If { keyword, then_branch, else_branch, .. } => {
                let span = keyword.span.to(then_branch.location());

                match else_branch {
                    Some(else_branch) => span.to(else_branch.location()),
                    None => span,
                }
            },
            Self::While { keyword, body, .. } => keyword.span.to(body.location()),
            Self::Function(declaration) => declaration.name.span,
            Self::Return { keyword, value } => match value {
                Some(value) => keyword.span.to(value.location()),
                None => keyword.span,
            },
            Self::Break { keyword } => keyword.span,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::Expression { expression } => expression.line(),
            Self::Print { keyword, .. }
            | Self::If { keyword, .. }
            | Self::While { keyword, .. }
            | Self::Return { keyword, .. }
            | Self::Break { keyword } => keyword.line,
            Self::Var { name, .. } => name.line,
            Self::Block { statements, .. } => statements.first().map_or(0, |statement| statement.line()),
            Self::Function(declaration) => declaration.name.line,
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ensure_sufficient_stack(|| match self {
            Self::Expression { expression } => write!(f, "{expression};"),
            Self::Print { expression, .. } => write!(f, "print {expression};"),
            Self::Var { name, initializer } => match initializer {
                Some(initializer) => write!(f, "var {} = {initializer};", name.lexeme),
                None => write!(f, "var {};", name.lexeme),
            },
            Self::Block { statements, .. } => write!(f, "{}", Block(statements)),
            Self::If { condition, then_branch, else_branch, .. } => {
                write!(f, "if ({condition}) ")?;

                match else_branch {
                    Some(else_branch) => {
                        // Braces keep a nested else-less `if` from capturing our `else`.
                        if matches!(**then_branch, Stmt::If { else_branch: None, .. }) {
                            write!(f, "{{ {then_branch} }} else {else_branch}")
                        } else {
                            write!(f, "{then_branch} else {else_branch}")
                        }
                    },
                    None => write!(f, "{then_branch}"),
                }
            },
            Self::While { condition, body, .. } => write!(f, "while ({condition}) {body}"),
            Self::Function(declaration) => write!(f, "{declaration}"),
            Self::Return { value, .. } => match value {
                Some(value) => write!(f, "return {value};"),
                None => write!(f, "return;"),
            },
            Self::Break { .. } => write!(f, "break;"),
        })
    }
}

struct Block<'a>(&'a [Stmt]);

impl Display for Block<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{{ }}");
        }

        let statements = self.0.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{{ {} }}", statements.join(" "))
    }
}
