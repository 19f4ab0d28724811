//! Function Handling
//!
//! Handles shell function definition and invocation:
//! - Function definition (adding the body text to the function table)
//! - Function calls (positional parameters, call-local variables)
//!
//! Bodies are stored unparsed and re-parsed on every call, so a function may
//! call functions defined after it. A call snapshots the shell variables and
//! restores them when it returns, whatever the outcome.

use crate::ast::types::{FunctionCallNode, FunctionDefinitionNode};
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::interpreter::Interpreter;
use crate::interpreter::types::ExecResult;
use crate::interpreter::word_expansion::expand_tokens;
use crate::parser::Parser;

impl<'e> Interpreter<'e> {
    pub(crate) fn define_function(&mut self, node: &FunctionDefinitionNode) -> ExecResult {
        tracing::debug!(name = %node.name, "define function");
        self.env.define_function(node.name.as_str(), node.body.as_str());
        ExecResult::empty()
    }

    pub(crate) async fn execute_function_call(
        &mut self,
        node: &FunctionCallNode,
    ) -> Result<ExecResult, InterpreterError> {
        let args = expand_tokens(&*self.env, self.policy(), &node.args)?;
        self.call_function(&node.name, args).await
    }

    /// Run a function body with `args` bound as `$1..$n`
    pub(crate) async fn call_function(
        &mut self,
        name: &str,
        args: Vec<String>,
    ) -> Result<ExecResult, InterpreterError> {
        let body = self
            .env
            .function(name)
            .map(str::to_string)
            .ok_or_else(|| InterpreterError::CommandNotFound(name.to_string()))?;

        let max_depth = self.limits().max_call_depth;
        if self.call_depth >= max_depth {
            return Err(InterpreterError::RecursionLimit {
                name: name.to_string(),
                depth: max_depth,
            });
        }

        let program = Parser::with_functions(self.env.functions.keys().cloned()).parse(&body)?;
        tracing::debug!(name, depth = self.call_depth + 1, args = args.len(), "call function");

        self.env.push_scope();
        self.env.bind_positional(&args);
        self.call_depth += 1;
        let result = self.execute_block(&program.body).await;
        self.call_depth -= 1;
        self.env.pop_scope();
        result
    }
}
