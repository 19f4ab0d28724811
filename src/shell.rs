//! Shell Session
//!
//! Main entry point for library users. Ties together the parser, the
//! interpreter, the command registry and the filesystem around one
//! persistent `Environment`.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::commands::{create_default_registry, CommandRegistry};
use crate::fs::{FileSystem, FsError, InMemoryFs, MkdirOptions};
use crate::interpreter::environment::{Environment, DEFAULT_HOME};
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::interpreter::{Interpreter, InterpreterOptions};
use crate::interpreter::types::{CancelToken, ExecResult, ExecutionLimits, ExpansionPolicy};
use crate::parser::{ParseException, Parser};
use crate::script::logical_lines;

/// Options for creating a shell session.
#[derive(Default)]
pub struct ShellOptions {
    /// Exported variables added on top of `USER`, `HOME` and `PATH`
    pub env: IndexMap<String, String>,
    /// Working directory (defaults to the home directory)
    pub cwd: Option<String>,
    /// File system instance (defaults to InMemoryFs)
    pub fs: Option<Arc<dyn FileSystem>>,
    /// Command table (defaults to every builtin command)
    pub registry: Option<Arc<CommandRegistry>>,
    pub limits: ExecutionLimits,
    pub expansion: ExpansionPolicy,
}

impl ShellOptions {
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn with_registry(mut self, registry: Arc<CommandRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_limits(mut self, limits: ExecutionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_expansion(mut self, expansion: ExpansionPolicy) -> Self {
        self.expansion = expansion;
        self
    }
}

/// Outcome of running a multi-line script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptResult {
    /// Output of every statement, newline-joined
    pub output: String,
    /// Status of the most recent failing statement
    pub last_failure: Option<String>,
    /// The script ran `exit`
    pub exited: bool,
}

impl ScriptResult {
    pub fn is_success(&self) -> bool {
        self.last_failure.is_none()
    }
}

/// Parse failures rendered the way the shell prints them
fn syntax_error(err: &ParseException) -> ExecResult {
    let message = if err.message.starts_with("syntax error") {
        format!("sh: {}", err.message)
    } else {
        format!("sh: syntax error: {}", err.message)
    };
    ExecResult::failure(message.clone(), message)
}

/// A shell session.
pub struct Shell {
    env: Environment,
    fs: Arc<dyn FileSystem>,
    registry: Arc<CommandRegistry>,
    options: InterpreterOptions,
    cancel: CancelToken,
    /// Code passed to `exit`, once the session has ended
    exit_code: Option<i32>,
}

impl Shell {
    /// Create a new shell session.
    pub async fn new(options: ShellOptions) -> Self {
        let mut env = Environment::with_defaults();
        for (name, value) in options.env {
            env.export(name, value);
        }
        let cwd = options.cwd.unwrap_or_else(|| env.home().to_string());

        let fs: Arc<dyn FileSystem> = match options.fs {
            Some(fs) => fs,
            None => {
                let fs = InMemoryFs::with_home(DEFAULT_HOME);
                if let Err(err) = fs.mkdir(&cwd, &MkdirOptions { recursive: true }).await {
                    tracing::warn!(cwd = %cwd, error = %err, "cannot create working directory");
                }
                Arc::new(fs)
            }
        };
        env.cwd = cwd;

        Self {
            env,
            fs,
            registry: options
                .registry
                .unwrap_or_else(|| Arc::new(create_default_registry())),
            options: InterpreterOptions {
                limits: options.limits,
                expansion: options.expansion,
            },
            cancel: CancelToken::new(),
            exit_code: None,
        }
    }

    /// Execute one line of input (which may hold several statements).
    pub async fn exec(&mut self, input: &str) -> ExecResult {
        if input.trim().is_empty() {
            return ExecResult::empty();
        }

        let mut parser = Parser::with_functions(self.env.functions.keys().cloned());
        let program = match parser.parse(input) {
            Ok(program) => program,
            Err(err) => {
                tracing::debug!(error = %err, "parse failed");
                return syntax_error(&err);
            }
        };

        self.cancel.reset();
        let mut interpreter = Interpreter::new(
            &mut self.env,
            self.registry.clone(),
            self.fs.clone(),
            self.options,
            self.cancel.clone(),
        );
        match interpreter.execute(&program).await {
            Ok(result) => result,
            Err(InterpreterError::Exit { code, output }) => {
                tracing::debug!(code, "session exit");
                self.exit_code = Some(code);
                ExecResult {
                    output,
                    status: (code != 0).then(|| code.to_string()),
                }
            }
            Err(InterpreterError::Cancelled { output }) => ExecResult::ok(output),
            Err(err) => {
                // Runtime errors are caught per statement; anything left is rendered the same way
                tracing::warn!(error = %err, "unhandled interpreter error");
                crate::interpreter::interpreter::runtime_failure(&err)
            }
        }
    }

    /// Execute script text, re-assembling multi-line blocks first.
    pub async fn exec_script(&mut self, text: &str) -> ScriptResult {
        let mut outputs = Vec::new();
        let mut last_failure = None;

        for line in logical_lines(text) {
            let result = self.exec(&line).await;
            if !result.is_success() {
                last_failure = result.status.clone();
            }
            outputs.push(result.output);
            if self.has_exited() || self.cancel.is_cancelled() {
                break;
            }
        }

        ScriptResult {
            output: crate::interpreter::types::join_outputs(&outputs),
            last_failure,
            exited: self.has_exited(),
        }
    }

    /// Read a script through the filesystem and execute it.
    pub async fn run_file(&mut self, path: &str) -> Result<ScriptResult, FsError> {
        let resolved = self.fs.resolve_path(&self.env.cwd, path);
        let text = self.fs.read_file(&resolved).await?;
        tracing::debug!(path = %resolved, bytes = text.len(), "running script");
        Ok(self.exec_script(&text).await)
    }

    /// Token that aborts the running statement when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn has_exited(&self) -> bool {
        self.exit_code.is_some()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn cwd(&self) -> &str {
        &self.env.cwd
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }
}

// ============================================================================
// Tests
// ============================================================================
