//! Interpreter Types
//!
//! Result, limits and policy types shared by the executor modules.
//!
//! Status convention: a statement succeeds when its status is absent, empty
//! or `"0"`. Any other text is a failure and usually doubles as the message
//! shown to the user.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// True for the success statuses: absent, `""` and `"0"`
pub fn is_truthy(status: Option<&str>) -> bool {
    matches!(status, None | Some("") | Some("0"))
}

/// Result of executing a statement or program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Newline-joined output of the statement and its children
    pub output: String,
    /// `None` or `""`/`"0"` for success, anything else is a failure
    pub status: Option<String>,
}

impl ExecResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failure(output: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: Some(status.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        is_truthy(self.status.as_deref())
    }

    /// Conventional process exit code for this result
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Join non-empty outputs with newlines
pub fn join_outputs<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() || part == "\n" {
            continue;
        }
        if !joined.is_empty() {
            joined.push('\n');
        }
        joined.push_str(part);
    }
    joined
}

/// Execution limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionLimits {
    /// Iterations a single `for`/`while` loop may run
    pub max_loop_iterations: usize,
    /// Nesting depth of function calls
    pub max_call_depth: usize,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            max_loop_iterations: 100,
            max_call_depth: 64,
        }
    }
}

/// What an unresolved `$name` reference expands to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionPolicy {
    /// Keep the reference text (`$name`) as written
    #[default]
    Literal,
    /// Expand to the empty string
    Empty,
}

/// Cooperative cancellation flag shared between the session and its driver
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation before the next run
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
