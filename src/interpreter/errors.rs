//! Interpreter Errors
//!
//! Two families share one enum:
//! - runtime errors (command not found, arithmetic failure, recursion or
//!   nesting limit, function body that fails to parse): caught at the
//!   statement boundary and rendered inline, execution continues with the
//!   next statement
//! - control flow (`Cancelled`, `Exit`): unwind through loops and function
//!   calls, carrying the output produced so far
//!
//! Each enclosing block prepends its own output to a control flow error
//! before re-raising it, so nothing printed before the unwind is lost.

use thiserror::Error;

use crate::parser::types::ParseException;

/// Arithmetic evaluation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{expression}: {message}")]
pub struct ArithmeticError {
    pub expression: String,
    pub message: String,
}

impl ArithmeticError {
    pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpreterError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("syntax error: empty pipeline stage")]
    EmptyCommand,

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error("{name}: maximum function call depth ({depth}) exceeded")]
    RecursionLimit { name: String, depth: usize },

    #[error("maximum nesting depth ({0}) exceeded")]
    NestingLimit(usize),

    #[error("{0}")]
    Parse(#[from] ParseException),

    #[error("pipeline stage failed: {0}")]
    Stage(String),

    #[error("cancelled")]
    Cancelled { output: String },

    #[error("exit {code}")]
    Exit { code: i32, output: String },
}

impl InterpreterError {
    /// Errors that unwind past statement boundaries
    pub fn is_control_flow(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::Exit { .. })
    }

    /// Output carried by a control flow error
    pub fn output(&self) -> &str {
        match self {
            Self::Cancelled { output } | Self::Exit { output, .. } => output,
            _ => "",
        }
    }

    /// Prepend output from the current context before re-raising.
    pub fn prepend_output(&mut self, earlier: &str) {
        if earlier.is_empty() {
            return;
        }
        if let Self::Cancelled { output } | Self::Exit { output, .. } = self {
            *output = if output.is_empty() {
                earlier.to_string()
            } else {
                format!("{}\n{}", earlier, output)
            };
        }
    }

    pub fn cancelled() -> Self {
        Self::Cancelled { output: String::new() }
    }

    pub fn exit(code: i32) -> Self {
        Self::Exit { code, output: String::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_not_found_message() {
        let err = InterpreterError::CommandNotFound("foo".to_string());
        assert_eq!(err.to_string(), "foo: command not found");
        assert!(!err.is_control_flow());
    }

    #[test]
    fn test_prepend_output_on_control_flow() {
        let mut err = InterpreterError::exit(3);
        err.prepend_output("b");
        err.prepend_output("a");
        assert_eq!(err.output(), "a\nb");
        assert!(err.is_control_flow());
    }

    #[test]
    fn test_prepend_output_ignores_runtime_errors() {
        let mut err = InterpreterError::EmptyCommand;
        err.prepend_output("lost");
        assert_eq!(err.output(), "");
    }

    #[test]
    fn test_arithmetic_conversion() {
        let err: InterpreterError = ArithmeticError::new("1/0", "division by 0").into();
        assert_eq!(err.to_string(), "arithmetic error: 1/0: division by 0");
    }
}
