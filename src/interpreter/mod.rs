//! Interpreter module
//!
//! Tree-walking executor for parsed programs, with the session state it
//! mutates and the builtins that need that state.

pub mod arithmetic;
pub mod builtins;
pub mod control_flow;
pub mod environment;
pub mod errors;
pub mod functions;
#[allow(clippy::module_inception)]
pub mod interpreter;
pub mod pipeline_execution;
pub mod types;
pub mod word_expansion;

pub use environment::Environment;
pub use errors::{ArithmeticError, InterpreterError};
pub use interpreter::{Interpreter, InterpreterOptions};
pub use types::{is_truthy, join_outputs, CancelToken, ExecResult, ExecutionLimits, ExpansionPolicy};
