//! Abstract Syntax Tree (AST) Types
//!
//! Nodes are built once per parsed text and never mutated; the executor
//! re-walks them on every run. Argument lists keep the lexer's tokens so
//! expansion can still tell quoted text from variable references.

use std::fmt;

use crate::parser::lexer::Token;

// =============================================================================
// PROGRAM & STATEMENTS
// =============================================================================

/// Root node: a complete program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Statement>,
}

impl Program {
    pub fn new(body: Vec<Statement>) -> Self {
        Self { body }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Command(CommandNode),
    Assignment(AssignmentNode),
    If(IfNode),
    For(ForNode),
    While(WhileNode),
    Case(CaseNode),
    FunctionDefinition(FunctionDefinitionNode),
    FunctionCall(FunctionCallNode),
    Expression(ExpressionNode),
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Command(_) => "Command",
            Statement::Assignment(_) => "Assignment",
            Statement::If(_) => "IfStatement",
            Statement::For(_) => "ForStatement",
            Statement::While(_) => "WhileStatement",
            Statement::Case(_) => "CaseStatement",
            Statement::FunctionDefinition(_) => "FunctionDefinition",
            Statement::FunctionCall(_) => "FunctionCall",
            Statement::Expression(_) => "ExpressionStatement",
        }
    }
}

// =============================================================================
// SIMPLE STATEMENTS
// =============================================================================

/// A flat command: `name arg...`, possibly containing `|` tokens that split
/// it into pipeline stages at execution time
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub name: Token,
    pub args: Vec<Token>,
}

impl CommandNode {
    pub fn new(name: Token, args: Vec<Token>) -> Self {
        Self { name, args }
    }

    pub fn has_pipe(&self) -> bool {
        self.args.iter().any(|t| t.kind == crate::parser::lexer::TokenKind::Pipe)
    }

    /// All tokens in order, name first
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        std::iter::once(&self.name).chain(self.args.iter())
    }
}

/// `name=value`; the value token keeps its quote style for expansion
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    pub id: String,
    pub value: Token,
}

/// `left op right` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    pub left: Token,
    pub operator: ComparisonOp,
    pub right: Token,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl ComparisonOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }

    pub fn negate(&self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Gt => Self::Le,
            Self::Lt => Self::Ge,
            Self::Ge => Self::Lt,
            Self::Le => Self::Gt,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// COMPOUND STATEMENTS
// =============================================================================

/// if cond; then ...; [else ...;] fi
///
/// `elif` is stored as a nested `IfNode` that forms the whole alternate.
#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub test: CommandNode,
    pub consequent: Vec<Statement>,
    pub alternate: Option<Vec<Statement>>,
}

/// for VAR in VALUES; do ...; done
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    /// Loop variable with any leading `$` removed
    pub var: String,
    pub values: Vec<Token>,
    pub body: Vec<Statement>,
}

/// while cond; do ...; done
#[derive(Debug, Clone, PartialEq)]
pub struct WhileNode {
    pub test: CommandNode,
    pub body: Vec<Statement>,
}

/// case WORD in PATTERN) ... ;; esac
#[derive(Debug, Clone, PartialEq)]
pub struct CaseNode {
    pub discriminant: Token,
    pub cases: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// Alternatives written as `a|b`; any exact match selects the clause
    pub patterns: Vec<Token>,
    pub body: Vec<Statement>,
}

// =============================================================================
// FUNCTIONS
// =============================================================================

/// Body text is stored unparsed and re-parsed on every call
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinitionNode {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallNode {
    pub name: String,
    pub args: Vec<Token>,
}
