//! Abstract Syntax Tree (AST) Types
//!
//! Architecture:
//!   Input → Lexer → Parser → AST → Interpreter → Output

pub mod types;

pub use types::*;
