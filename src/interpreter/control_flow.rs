//! Control Flow Execution
//!
//! Handles control flow constructs:
//! - if/elif/else
//! - for loops
//! - while loops
//! - case statements
//!
//! Conditions are commands. Their output is kept in the statement result and
//! their status picks the branch under the shell's truthiness convention.
//! Loops stop after `ExecutionLimits::max_loop_iterations` and append a
//! message instead of raising.

use crate::ast::types::{CaseNode, CommandNode, ForNode, IfNode, WhileNode};
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::interpreter::{runtime_failure, Interpreter};
use crate::interpreter::types::{join_outputs, ExecResult};
use crate::interpreter::word_expansion::{expand_for_values, expand_token};

pub const ITERATION_LIMIT_MESSAGE: &str = "Error: Maximum iteration limit reached";

/// Result of evaluating a condition command
struct Condition {
    passed: bool,
    output: String,
}

/// Prepend `outputs` to a control flow error on its way out of a loop
fn unwind(mut err: InterpreterError, outputs: &[String]) -> InterpreterError {
    err.prepend_output(&join_outputs(outputs));
    err
}

impl<'e> Interpreter<'e> {
    async fn evaluate_condition(&mut self, test: &CommandNode) -> Result<Condition, InterpreterError> {
        let result = match self.execute_condition(test).await {
            Ok(result) => result,
            Err(err) if err.is_control_flow() => return Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "condition failed");
                runtime_failure(&err)
            }
        };
        Ok(Condition {
            passed: result.is_success(),
            output: result.output,
        })
    }

    pub(crate) async fn execute_if(&mut self, node: &IfNode) -> Result<ExecResult, InterpreterError> {
        let condition = self.evaluate_condition(&node.test).await?;
        let branch = if condition.passed {
            Some(&node.consequent)
        } else {
            node.alternate.as_ref()
        };

        let Some(body) = branch else {
            return Ok(ExecResult::ok(condition.output));
        };
        match self.execute_block(body).await {
            Ok(result) => Ok(ExecResult {
                output: join_outputs([condition.output.as_str(), result.output.as_str()]),
                status: result.status,
            }),
            Err(err) => Err(unwind(err, &[condition.output])),
        }
    }

    pub(crate) async fn execute_for(&mut self, node: &ForNode) -> Result<ExecResult, InterpreterError> {
        let values = expand_for_values(&*self.env, self.policy(), &node.values)?;
        let max = self.limits().max_loop_iterations;
        let mut outputs = Vec::new();
        let mut status = None;

        for value in values.iter().take(max) {
            self.check_cancelled().map_err(|err| unwind(err, &outputs))?;
            self.env.set(node.var.as_str(), value.as_str());
            let result = self
                .execute_block(&node.body)
                .await
                .map_err(|err| unwind(err, &outputs))?;
            outputs.push(result.output);
            status = result.status;
        }

        if values.len() > max {
            tracing::warn!(var = %node.var, values = values.len(), "for loop hit iteration limit");
            outputs.push(ITERATION_LIMIT_MESSAGE.to_string());
            status = Some(ITERATION_LIMIT_MESSAGE.to_string());
        }
        Ok(ExecResult {
            output: join_outputs(&outputs),
            status,
        })
    }

    pub(crate) async fn execute_while(&mut self, node: &WhileNode) -> Result<ExecResult, InterpreterError> {
        let max = self.limits().max_loop_iterations;
        let mut outputs = Vec::new();
        let mut status = None;
        let mut iterations = 0;

        loop {
            self.check_cancelled().map_err(|err| unwind(err, &outputs))?;
            let condition = self
                .evaluate_condition(&node.test)
                .await
                .map_err(|err| unwind(err, &outputs))?;
            outputs.push(condition.output);
            if !condition.passed {
                break;
            }
            if iterations >= max {
                tracing::warn!(iterations, "while loop hit iteration limit");
                outputs.push(ITERATION_LIMIT_MESSAGE.to_string());
                status = Some(ITERATION_LIMIT_MESSAGE.to_string());
                break;
            }
            let result = self
                .execute_block(&node.body)
                .await
                .map_err(|err| unwind(err, &outputs))?;
            outputs.push(result.output);
            status = result.status;
            iterations += 1;
        }

        Ok(ExecResult {
            output: join_outputs(&outputs),
            status,
        })
    }

    pub(crate) async fn execute_case(&mut self, node: &CaseNode) -> Result<ExecResult, InterpreterError> {
        let word = self.resolve_value(&node.discriminant)?;
        for clause in &node.cases {
            for pattern in &clause.patterns {
                if expand_token(&*self.env, self.policy(), pattern)? == word {
                    return self.execute_block(&clause.body).await;
                }
            }
        }
        Ok(ExecResult::empty())
    }
}
