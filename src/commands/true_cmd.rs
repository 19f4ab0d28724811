use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct TrueCommand;

#[async_trait]
impl Command for TrueCommand {
    fn name(&self) -> &'static str {
        "true"
    }

    async fn execute(&self, _ctx: CommandContext) -> CommandResult {
        CommandResult::success()
    }
}

pub struct FalseCommand;

#[async_trait]
impl Command for FalseCommand {
    fn name(&self) -> &'static str {
        "false"
    }

    async fn execute(&self, _ctx: CommandContext) -> CommandResult {
        CommandResult::failure("false")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::test_support::ctx;

    #[tokio::test]
    async fn test_true_succeeds_silently() {
        let (ctx, out) = ctx(&[], None).await;
        let result = TrueCommand.execute(ctx).await;
        assert!(result.is_success());
        assert!(result.status.is_none());
        assert!(out.contents().is_empty());
    }

    #[tokio::test]
    async fn test_false_has_failure_status() {
        let (ctx, out) = ctx(&[], None).await;
        let result = FalseCommand.execute(ctx).await;
        assert!(!result.is_success());
        assert_eq!(result.status.as_deref(), Some("false"));
        assert!(out.contents().is_empty());
    }
}
