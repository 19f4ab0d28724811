//! Pipeline Execution
//!
//! Handles `Command` statements:
//! - a call to a session function (no pipes)
//! - a state builtin run on the interpreter's environment (no pipes)
//! - one or more registry commands joined by `|`
//!
//! Every stage of a pipeline runs on its own task. Stage `i` writes into a
//! `Pipe` that stage `i + 1` reads; the first stage reads an empty stream and
//! the last writes into a capture buffer. A finished stage closes both of its
//! streams, so a downstream reader sees end of stream and an upstream writer
//! gets a broken pipe. The statement's status is the last stage's, read after
//! every stage has been joined.
//!
//! Stages see the environment as a snapshot: state builtins and session
//! functions inside a multi-stage pipeline run on a copy before the stages
//! start, and their changes are discarded.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::types::CommandNode;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::builtins;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::interpreter::{with_status_text, Interpreter};
use crate::interpreter::types::ExecResult;
use crate::interpreter::word_expansion::{expand_token, expand_tokens};
use crate::io::{CaptureStream, IoStream, NullStream, Pipe};
use crate::parser::lexer::{Token, TokenKind};

/// A resolved pipeline stage
enum Stage {
    Registry {
        command: Arc<dyn Command>,
        args: Vec<String>,
    },
    /// State builtin or function output computed up front against a snapshot
    Precomputed { output: String, status: Option<String> },
}

/// Closes a stage's streams when its task ends, even by panic
struct StreamGuard {
    stdin: Arc<dyn IoStream>,
    stdout: Arc<dyn IoStream>,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.stdout.close();
        self.stdin.close();
    }
}

/// Split a flat token run at each `|`
pub fn split_stages<'t>(tokens: &[&'t Token]) -> Vec<Vec<&'t Token>> {
    let mut stages = vec![Vec::new()];
    for token in tokens {
        if token.kind == TokenKind::Pipe {
            stages.push(Vec::new());
        } else if let Some(stage) = stages.last_mut() {
            stage.push(*token);
        }
    }
    stages
}

/// Drop the newline most commands end their output with
fn trim_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

impl<'e> Interpreter<'e> {
    /// A command as a statement: failing statuses are shown after the output
    pub(crate) async fn execute_command_statement(
        &mut self,
        node: &CommandNode,
    ) -> Result<ExecResult, InterpreterError> {
        if let Some(result) = self.try_function_command(node).await {
            return result;
        }
        Ok(with_status_text(self.run_command(node).await?))
    }

    /// A command as an `if`/`while` condition: output is kept, the status is
    /// only used to choose the branch
    pub(crate) async fn execute_condition(
        &mut self,
        node: &CommandNode,
    ) -> Result<ExecResult, InterpreterError> {
        if let Some(result) = self.try_function_command(node).await {
            return result;
        }
        self.run_command(node).await
    }

    /// Call a session function named by a plain command
    async fn try_function_command(
        &mut self,
        node: &CommandNode,
    ) -> Option<Result<ExecResult, InterpreterError>> {
        if node.has_pipe() || !self.env.has_function(&node.name.value) {
            return None;
        }
        let args = match expand_tokens(&*self.env, self.policy(), &node.args) {
            Ok(args) => args,
            Err(err) => return Some(Err(err)),
        };
        Some(self.call_function(&node.name.value, args).await)
    }

    /// Run a command or pipeline; the result's output excludes the status
    pub(crate) async fn run_command(&mut self, node: &CommandNode) -> Result<ExecResult, InterpreterError> {
        let tokens: Vec<&Token> = node.tokens().collect();
        let stages = split_stages(&tokens);

        if stages.len() == 1 {
            let words = self.expand_stage(&stages[0])?;
            let (name, args) = words.split_first().ok_or(InterpreterError::EmptyCommand)?;
            let fs = self.fs.clone();
            if let Some(result) = builtins::dispatch(name, &mut *self.env, fs.as_ref(), args).await {
                return result;
            }
        }

        let mut resolved = Vec::with_capacity(stages.len());
        for stage in &stages {
            resolved.push(self.resolve_stage(stage).await?);
        }
        self.run_pipeline(resolved).await
    }

    fn expand_stage(&self, tokens: &[&Token]) -> Result<Vec<String>, InterpreterError> {
        tokens
            .iter()
            .map(|token| expand_token(&*self.env, self.policy(), token))
            .collect()
    }

    async fn resolve_stage(&self, tokens: &[&Token]) -> Result<Stage, InterpreterError> {
        let words = self.expand_stage(tokens)?;
        let (name, args) = words.split_first().ok_or(InterpreterError::EmptyCommand)?;
        if name.is_empty() {
            return Err(InterpreterError::EmptyCommand);
        }

        if self.env.has_function(name) {
            let result = self.run_function_stage(name, args).await?;
            return Ok(Stage::Precomputed { output: result.output, status: result.status });
        }

        if builtins::is_state_builtin(name) {
            let mut snapshot = self.env.clone();
            let result = match builtins::dispatch(name, &mut snapshot, self.fs.as_ref(), args).await {
                Some(Ok(result)) => result,
                Some(Err(InterpreterError::Exit { code, output })) => {
                    ExecResult { output, status: Some(code.to_string()) }
                }
                Some(Err(err)) => return Err(err),
                None => ExecResult::empty(),
            };
            return Ok(Stage::Precomputed { output: result.output, status: result.status });
        }

        match self.registry.resolve(name) {
            Some(command) => Ok(Stage::Registry { command, args: args.to_vec() }),
            None => Err(InterpreterError::CommandNotFound(name.clone())),
        }
    }

    /// Call a session function on a copy of the environment
    async fn run_function_stage(&self, name: &str, args: &[String]) -> Result<ExecResult, InterpreterError> {
        let mut snapshot = self.env.clone();
        let mut child = Interpreter::new(
            &mut snapshot,
            self.registry.clone(),
            self.fs.clone(),
            self.options,
            self.cancel.clone(),
        );
        child.call_depth = self.call_depth;
        child.block_depth = self.block_depth;
        match child.call_function(name, args.to_vec()).await {
            Err(InterpreterError::Exit { code, output }) => Ok(ExecResult {
                output,
                status: Some(code.to_string()),
            }),
            other => other,
        }
    }

    async fn run_pipeline(&mut self, stages: Vec<Stage>) -> Result<ExecResult, InterpreterError> {
        let count = stages.len();
        let pipes: Vec<Arc<Pipe>> = (1..count).map(|_| Arc::new(Pipe::new())).collect();
        let capture = Arc::new(CaptureStream::new());
        let env: HashMap<String, String> = self
            .env
            .env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        tracing::debug!(stages = count, "starting pipeline");

        let mut handles = Vec::with_capacity(count);
        for (i, stage) in stages.into_iter().enumerate() {
            let stdin: Arc<dyn IoStream> = if i == 0 {
                Arc::new(NullStream)
            } else {
                pipes[i - 1].clone()
            };
            let stdout: Arc<dyn IoStream> = if i + 1 == count {
                capture.clone()
            } else {
                pipes[i].clone()
            };
            let guard = StreamGuard {
                stdin: stdin.clone(),
                stdout: stdout.clone(),
            };

            let handle = match stage {
                Stage::Registry { command, args } => {
                    let ctx = CommandContext {
                        args,
                        stdin,
                        stdout,
                        cwd: self.env.cwd.clone(),
                        env: env.clone(),
                        fs: self.fs.clone(),
                    };
                    tokio::spawn(async move {
                        let _guard = guard;
                        command.execute(ctx).await
                    })
                }
                Stage::Precomputed { output, status } => tokio::spawn(async move {
                    let _guard = guard;
                    if !output.is_empty() {
                        if let Err(err) = stdout.writeln(&output).await {
                            return CommandResult::from(err);
                        }
                    }
                    CommandResult { status }
                }),
            };
            handles.push(handle);
        }

        let mut last = CommandResult::success();
        for (i, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(result) => {
                    tracing::trace!(stage = i, status = ?result.status, "stage finished");
                    last = result;
                }
                Err(err) => return Err(InterpreterError::Stage(err.to_string())),
            }
        }

        Ok(ExecResult {
            output: trim_trailing_newline(capture.contents()),
            status: last.status,
        })
    }
}
