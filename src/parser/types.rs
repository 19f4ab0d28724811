//! Parser Types and Constants
//!
//! Shared error type and limits used across parser modules.

use thiserror::Error;
use crate::parser::lexer::Token;

// Parser limits to prevent hangs and resource exhaustion
pub const MAX_INPUT_SIZE: usize = 1_000_000; // 1MB max input
pub const MAX_TOKENS: usize = 100_000;
/// Statements (and separators) consumed by one block before it is rejected
pub const MAX_BLOCK_ITERATIONS: usize = 100;
/// Compound statements (`if`, `elif`, `for`, `while`, `case`) open at once
pub const MAX_NESTING_DEPTH: usize = 64;

/// Structured parse failure with a human-readable reason
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseException {
    pub message: String,
    /// Index of the offending token in the token stream
    pub position: usize,
    pub token: Option<Token>,
}

impl ParseException {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
            token: None,
        }
    }

    pub fn with_token(message: impl Into<String>, position: usize, token: Token) -> Self {
        Self {
            message: message.into(),
            position,
            token: Some(token),
        }
    }

    /// Error for a token that cannot start or continue the current construct
    pub fn unexpected(position: usize, token: &Token) -> Self {
        Self::with_token(
            format!("syntax error near unexpected token `{}'", token.value),
            position,
            token.clone(),
        )
    }

    /// Error for input that ended while a construct was still open
    pub fn expected(what: &str, position: usize) -> Self {
        Self::new(format!("syntax error: expected {}", what), position)
    }
}
