// src/commands/pwd/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct PwdCommand;

#[async_trait]
impl Command for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        match ctx.writeln(&ctx.cwd).await {
            Ok(()) => CommandResult::success(),
            Err(result) => result,
        }
    }
}
