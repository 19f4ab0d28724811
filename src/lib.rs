//! tiny-sh - A small embeddable command language
//!
//! Lexer, recursive descent parser and tree-walking interpreter for a
//! shell-like language with variables, arithmetic, `if`/`for`/`while`/`case`,
//! functions and concurrent pipelines over a pluggable filesystem.

pub mod ast;
pub mod commands;
pub mod config;
pub mod fs;
pub mod interpreter;
pub mod io;
pub mod parser;
pub mod script;
pub mod shell;

pub use ast::types::*;
pub use config::{ConfigError, ShellConfig};
pub use interpreter::{CancelToken, ExecResult, ExecutionLimits, ExpansionPolicy, InterpreterError};
pub use parser::{parse, ParseException, Parser};
pub use shell::{ScriptResult, Shell, ShellOptions};
