//! Parser module
//!
//! Lexer and recursive descent parser for shell command text.

pub mod types;
pub mod lexer;
pub mod parser;

// Re-exports
pub use types::ParseException;
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{parse, Parser};
