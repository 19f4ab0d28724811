//! Interpreter - AST Execution Engine
//!
//! Walks a parsed `Program` against one session `Environment`.
//!
//! Statement outputs are newline-joined in order. Each statement's status
//! becomes `$?` for the next one. Runtime errors are caught at the statement
//! boundary and rendered inline as `sh: <message>`; control flow errors
//! (`Exit`, `Cancelled`) unwind, collecting output on the way out.
//!
//! Delegates to specialized modules for:
//! - Word expansion (word_expansion.rs)
//! - Arithmetic evaluation (arithmetic.rs)
//! - If/for/while/case (control_flow.rs)
//! - Function definition and calls (functions.rs)
//! - Commands and pipelines (pipeline_execution.rs)
//! - State builtins (builtins/)

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::ast::types::{ComparisonOp, ExpressionNode, Program, Statement};
use crate::commands::CommandRegistry;
use crate::fs::FileSystem;
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::types::{
    join_outputs, CancelToken, ExecResult, ExecutionLimits, ExpansionPolicy,
};
use crate::interpreter::word_expansion::{expand_assignment_value, expand_token, lookup};
use crate::parser::lexer::{Token, TokenKind};

/// Blocks that may be executing inside one another, function bodies included
pub const MAX_BLOCK_DEPTH: usize = 100;

/// Boxed future returned by the recursive executor entry points
pub type ExecFuture<'f> =
    Pin<Box<dyn Future<Output = Result<ExecResult, InterpreterError>> + Send + 'f>>;

/// Options for creating an interpreter instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpreterOptions {
    pub limits: ExecutionLimits,
    pub expansion: ExpansionPolicy,
}

/// Executor bound to one environment and its collaborators
pub struct Interpreter<'e> {
    pub(crate) env: &'e mut Environment,
    pub(crate) registry: Arc<CommandRegistry>,
    pub(crate) fs: Arc<dyn FileSystem>,
    pub(crate) options: InterpreterOptions,
    pub(crate) cancel: CancelToken,
    /// Active function calls
    pub(crate) call_depth: usize,
    /// Blocks currently executing
    pub(crate) block_depth: usize,
}

/// Inline rendering of a runtime error
pub fn runtime_failure(err: &InterpreterError) -> ExecResult {
    let message = format!("sh: {}", err);
    ExecResult::failure(message.clone(), message)
}

/// Append a failing status to the output it belongs to
pub fn with_status_text(result: ExecResult) -> ExecResult {
    if result.is_success() {
        return result;
    }
    let status = result.status.clone().unwrap_or_default();
    ExecResult {
        output: join_outputs([result.output.as_str(), status.as_str()]),
        status: result.status,
    }
}

impl<'e> Interpreter<'e> {
    pub fn new(
        env: &'e mut Environment,
        registry: Arc<CommandRegistry>,
        fs: Arc<dyn FileSystem>,
        options: InterpreterOptions,
        cancel: CancelToken,
    ) -> Self {
        Self {
            env,
            registry,
            fs,
            options,
            cancel,
            call_depth: 0,
            block_depth: 0,
        }
    }

    pub fn limits(&self) -> &ExecutionLimits {
        &self.options.limits
    }

    pub fn policy(&self) -> ExpansionPolicy {
        self.options.expansion
    }

    /// Execute a whole program
    pub async fn execute(&mut self, program: &Program) -> Result<ExecResult, InterpreterError> {
        tracing::debug!(statements = program.body.len(), "executing program");
        self.execute_block(&program.body).await
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), InterpreterError> {
        if self.cancel.is_cancelled() {
            tracing::debug!("execution cancelled");
            return Err(InterpreterError::cancelled());
        }
        Ok(())
    }

    /// Run statements in order, joining their output
    pub(crate) fn execute_block<'f>(&'f mut self, body: &'f [Statement]) -> ExecFuture<'f> {
        Box::pin(async move {
            if self.block_depth >= MAX_BLOCK_DEPTH {
                return Err(InterpreterError::NestingLimit(MAX_BLOCK_DEPTH));
            }
            self.block_depth += 1;
            let result = self.run_statements(body).await;
            self.block_depth -= 1;
            result
        })
    }

    async fn run_statements(&mut self, body: &[Statement]) -> Result<ExecResult, InterpreterError> {
        let mut outputs: Vec<String> = Vec::new();
        let mut status: Option<String> = None;

        for statement in body {
            if let Err(mut err) = self.check_cancelled() {
                err.prepend_output(&join_outputs(&outputs));
                return Err(err);
            }

            let result = match self.execute_statement(statement).await {
                Ok(result) => result,
                Err(mut err) if err.is_control_flow() => {
                    err.prepend_output(&join_outputs(&outputs));
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(statement = statement.kind(), error = %err, "runtime error");
                    runtime_failure(&err)
                }
            };

            self.env.last_exit_code = result.exit_code();
            outputs.push(result.output);
            status = result.status;
        }

        Ok(ExecResult {
            output: join_outputs(&outputs),
            status,
        })
    }

    pub(crate) fn execute_statement<'f>(&'f mut self, statement: &'f Statement) -> ExecFuture<'f> {
        Box::pin(async move {
            match statement {
                Statement::Command(node) => self.execute_command_statement(node).await,
                Statement::Assignment(node) => {
                    let value = expand_assignment_value(&*self.env, self.policy(), &node.value)?;
                    tracing::trace!(name = %node.id, value = %value, "assign");
                    self.env.set(node.id.clone(), value);
                    Ok(ExecResult::empty())
                }
                Statement::If(node) => self.execute_if(node).await,
                Statement::For(node) => self.execute_for(node).await,
                Statement::While(node) => self.execute_while(node).await,
                Statement::Case(node) => self.execute_case(node).await,
                Statement::FunctionDefinition(node) => Ok(self.define_function(node)),
                Statement::FunctionCall(node) => self.execute_function_call(node).await,
                Statement::Expression(node) => self.execute_expression(node),
            }
        })
    }

    /// Value of a bare word that may name a variable (`case x in`, `x == 1`)
    pub(crate) fn resolve_value(&self, token: &Token) -> Result<String, InterpreterError> {
        if token.kind == TokenKind::Identifier && token.quote.is_none() {
            if let Some(value) = lookup(&*self.env, &token.value) {
                return Ok(value);
            }
        }
        expand_token(&*self.env, self.policy(), token)
    }

    /// `left op right` comparison statement
    fn execute_expression(&mut self, node: &ExpressionNode) -> Result<ExecResult, InterpreterError> {
        let left = self.resolve_value(&node.left)?;
        let right = self.resolve_value(&node.right)?;
        if compare(&left, node.operator, &right) {
            Ok(ExecResult::ok(format!("true: \"{}\" {} \"{}\"", left, node.operator, right)))
        } else {
            let text = format!("false: \"{}\" {} \"{}\"", left, node.operator.negate(), right);
            Ok(ExecResult::failure(text, "false"))
        }
    }
}

/// Numeric when both sides are numbers, lexicographic otherwise
pub fn compare(left: &str, op: ComparisonOp, right: &str) -> bool {
    let ordering = match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r),
        _ => Some(left.cmp(right)),
    };
    let Some(ordering) = ordering else {
        return op == ComparisonOp::Ne;
    };
    match op {
        ComparisonOp::Eq => ordering.is_eq(),
        ComparisonOp::Ne => ordering.is_ne(),
        ComparisonOp::Gt => ordering.is_gt(),
        ComparisonOp::Lt => ordering.is_lt(),
        ComparisonOp::Ge => ordering.is_ge(),
        ComparisonOp::Le => ordering.is_le(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::commands::{create_default_registry, Command, CommandContext, CommandResult};
    use crate::fs::InMemoryFs;
    use crate::parser::parse;

    /// Run `input` in `env`, returning the result or the unwound error
    pub async fn run_in(env: &mut Environment, input: &str) -> Result<ExecResult, InterpreterError> {
        let program = parse(input).expect("parse failed");
        let fs: Arc<dyn FileSystem> = Arc::new(InMemoryFs::with_home("/home/user"));
        let mut interpreter = Interpreter::new(
            env,
            Arc::new(create_default_registry()),
            fs,
            InterpreterOptions::default(),
            CancelToken::new(),
        );
        interpreter.execute(&program).await
    }

    pub async fn run(input: &str) -> ExecResult {
        let mut env = Environment::with_defaults();
        run_in(&mut env, input).await.expect("execution failed")
    }

    /// `trip`: cancels the running interpreter, as Ctrl-C would mid-statement
    pub struct TripCommand {
        pub token: CancelToken,
    }

    #[async_trait::async_trait]
    impl Command for TripCommand {
        fn name(&self) -> &'static str {
            "trip"
        }

        async fn execute(&self, ctx: CommandContext) -> CommandResult {
            self.token.cancel();
            match ctx.writeln("tripped").await {
                Ok(()) => CommandResult::success(),
                Err(result) => result,
            }
        }
    }

    /// Like `run_in`, with `trip` registered against the interpreter's token
    pub async fn run_with_trip(env: &mut Environment, input: &str) -> Result<ExecResult, InterpreterError> {
        let program = parse(input).expect("parse failed");
        let cancel = CancelToken::new();
        let mut registry = create_default_registry();
        registry.register(Arc::new(TripCommand { token: cancel.clone() }));
        let mut interpreter = Interpreter::new(
            env,
            Arc::new(registry),
            Arc::new(InMemoryFs::new()),
            InterpreterOptions::default(),
            cancel,
        );
        interpreter.execute(&program).await
    }

    #[tokio::test]
    async fn test_statements_join_output() {
        let result = run("echo a; echo b").await;
        assert_eq!(result.output, "a\nb");
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_assignment_and_expansion() {
        let result = run("a=10; echo $a; b=$((a*2)); echo \"b is $b\"").await;
        assert_eq!(result.output, "10\nb is 20");
    }

    #[tokio::test]
    async fn test_command_not_found_continues() {
        let result = run("nosuch arg; echo after").await;
        assert_eq!(result.output, "sh: nosuch: command not found\nafter");
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_failure_status_is_shown() {
        let result = run("[ 1 -eq 2 ]").await;
        assert_eq!(result.output, "false");
        assert_eq!(result.status.as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_exit_status_variable() {
        let result = run("false; echo $?; true; echo $?").await;
        assert_eq!(result.output, "false\n1\n0");
    }

    #[tokio::test]
    async fn test_arithmetic_error_is_inline() {
        let result = run("x=$((1/0)); echo next").await;
        assert_eq!(result.output, "sh: arithmetic error: 1/0: division by 0\nnext");
    }

    #[tokio::test]
    async fn test_expression_statement() {
        let result = run("5 > 3").await;
        assert_eq!(result.output, "true: \"5\" > \"3\"");
        let result = run("a=2; $a == 3").await;
        assert_eq!(result.output, "false: \"2\" != \"3\"");
        assert!(!result.is_success());
        let result = run("apple < banana").await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_numeric_versus_lexicographic_compare() {
        assert!(compare("10", ComparisonOp::Gt, "9"));
        assert!(!compare("10", ComparisonOp::Gt, "9x"));
        assert!(compare("1.0", ComparisonOp::Eq, "1"));
        assert!(compare("a", ComparisonOp::Le, "a"));
    }

    #[tokio::test]
    async fn test_exit_unwinds_with_output() {
        let mut env = Environment::with_defaults();
        let err = run_in(&mut env, "echo before; exit 3; echo after").await.unwrap_err();
        match err {
            InterpreterError::Exit { code, output } => {
                assert_eq!(code, 3);
                assert_eq!(output, "before");
            }
            other => panic!("expected exit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let mut env = Environment::with_defaults();
        let program = parse("echo a").unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut interpreter = Interpreter::new(
            &mut env,
            Arc::new(create_default_registry()),
            Arc::new(InMemoryFs::new()),
            InterpreterOptions::default(),
            cancel,
        );
        let err = interpreter.execute(&program).await.unwrap_err();
        assert!(matches!(err, InterpreterError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_cancel_mid_program_keeps_earlier_output() {
        let mut env = Environment::with_defaults();
        let err = run_with_trip(&mut env, "echo one; trip; echo never").await.unwrap_err();
        assert!(matches!(err, InterpreterError::Cancelled { .. }));
        assert_eq!(err.output(), "one\ntripped");
    }

    #[tokio::test]
    async fn test_state_builtins_change_environment() {
        let mut env = Environment::with_defaults();
        run_in(&mut env, "cd /tmp; export A=1; set b = 2").await.unwrap();
        assert_eq!(env.cwd, "/tmp");
        assert_eq!(env.env.get("A").map(String::as_str), Some("1"));
        assert_eq!(env.get("b"), Some("2"));
        let result = run_in(&mut env, "pwd").await.unwrap();
        assert_eq!(result.output, "/tmp");
    }
}
