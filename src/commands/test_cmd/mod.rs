// src/commands/test_cmd/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

/// Status text of a test that evaluated to false
pub const FALSE_STATUS: &str = "false";

pub struct TestCommand;

#[async_trait]
impl Command for TestCommand {
    fn name(&self) -> &'static str {
        "test"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let args: Vec<&str> = ctx.args.iter().map(|s| s.as_str()).collect();
        run_test(&args, &ctx).await
    }
}

/// `[ expr ]`, the same test with a closing bracket
pub struct BracketCommand;

#[async_trait]
impl Command for BracketCommand {
    fn name(&self) -> &'static str {
        "["
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        if ctx.args.last().map(|s| s.as_str()) != Some("]") {
            return CommandResult::failure("[: missing `]'");
        }
        let args: Vec<&str> = ctx.args[..ctx.args.len() - 1]
            .iter()
            .map(|s| s.as_str())
            .collect();
        run_test(&args, &ctx).await
    }
}

async fn run_test(args: &[&str], ctx: &CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::failure(FALSE_STATUS);
    }
    match evaluate_expression(args, ctx).await {
        Ok(true) => CommandResult::success(),
        Ok(false) => CommandResult::failure(FALSE_STATUS),
        Err(message) => CommandResult::failure(format!("test: {}", message)),
    }
}

fn integer(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{}: integer expression expected", value))
}

async fn evaluate_expression(args: &[&str], ctx: &CommandContext) -> Result<bool, String> {
    if args.len() == 1 {
        return Ok(!args[0].is_empty());
    }

    if args[0] == "!" {
        return Ok(!Box::pin(evaluate_expression(&args[1..], ctx)).await?);
    }

    // -o binds looser than -a
    if args.len() >= 3 {
        for op in ["-o", "-a"] {
            if let Some(i) = args.iter().position(|a| *a == op) {
                if i == 0 || i == args.len() - 1 {
                    continue;
                }
                let left = Box::pin(evaluate_expression(&args[..i], ctx)).await?;
                let right = Box::pin(evaluate_expression(&args[i + 1..], ctx)).await?;
                return Ok(if op == "-o" { left || right } else { left && right });
            }
        }
    }

    if args.len() == 3 {
        let (left, op, right) = (args[0], args[1], args[2]);
        return match op {
            "=" | "==" => Ok(left == right),
            "!=" => Ok(left != right),
            "<" => Ok(left < right),
            ">" => Ok(left > right),
            "-eq" => Ok(integer(left)? == integer(right)?),
            "-ne" => Ok(integer(left)? != integer(right)?),
            "-lt" => Ok(integer(left)? < integer(right)?),
            "-le" => Ok(integer(left)? <= integer(right)?),
            "-gt" => Ok(integer(left)? > integer(right)?),
            "-ge" => Ok(integer(left)? >= integer(right)?),
            _ => Err(format!("{}: binary operator expected", op)),
        };
    }

    if args.len() == 2 {
        let (op, operand) = (args[0], args[1]);
        return match op {
            "-z" => Ok(operand.is_empty()),
            "-n" => Ok(!operand.is_empty()),
            "-e" => Ok(ctx.fs.exists(&ctx.resolve(operand)).await),
            "-f" => Ok(ctx
                .fs
                .stat(&ctx.resolve(operand))
                .await
                .map(|stat| stat.is_file)
                .unwrap_or(false)),
            "-d" => Ok(ctx
                .fs
                .stat(&ctx.resolve(operand))
                .await
                .map(|stat| stat.is_directory)
                .unwrap_or(false)),
            _ => Err(format!("{}: unary operator expected", op)),
        };
    }

    Err("too many arguments".to_string())
}
