// src/commands/head/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

const DEFAULT_LINES: usize = 10;

pub struct HeadCommand;

fn parse_head_args(args: &[String]) -> Result<(usize, Vec<String>), String> {
    let mut lines = DEFAULT_LINES;
    let mut files = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        let count = if arg == "-n" {
            i += 1;
            Some(args.get(i).map(String::as_str).unwrap_or(""))
        } else if let Some(n) = arg.strip_prefix("--lines=") {
            Some(n)
        } else if let Some(n) = arg.strip_prefix("-n") {
            Some(n)
        } else if arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c.is_ascii_digit()) {
            Some(&arg[1..])
        } else {
            files.push(arg.clone());
            None
        };
        if let Some(n) = count {
            lines = n
                .parse()
                .map_err(|_| format!("head: invalid number of lines: '{}'", n))?;
        }
        i += 1;
    }
    Ok((lines, files))
}

#[async_trait]
impl Command for HeadCommand {
    fn name(&self) -> &'static str {
        "head"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let (lines, files) = match parse_head_args(&ctx.args) {
            Ok(parsed) => parsed,
            Err(e) => return CommandResult::failure(e),
        };

        if files.is_empty() {
            return match head_stdin(&ctx, lines).await {
                Ok(()) => CommandResult::success(),
                Err(result) => result,
            };
        }

        let mut errors = Vec::new();
        for file in &files {
            let content = match ctx.read_operand(file).await {
                Ok(c) => c,
                Err(e) => {
                    errors.push(format!("head: {}", e));
                    continue;
                }
            };
            for line in content.lines().take(lines) {
                if let Err(result) = ctx.writeln(line).await {
                    return result;
                }
            }
        }

        if errors.is_empty() {
            CommandResult::success()
        } else {
            CommandResult::failure(errors.join("\n"))
        }
    }
}

/// Copy the first lines of stdin, then stop reading so the upstream stage
/// sees a closed pipe
async fn head_stdin(ctx: &CommandContext, lines: usize) -> Result<(), CommandResult> {
    for _ in 0..lines {
        match ctx.stdin.readline().await? {
            Some(line) => ctx.writeln(&line).await?,
            None => break,
        }
    }
    ctx.stdin.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::test_support::{ctx, ctx_with};
    use crate::fs::InMemoryFs;
    use std::sync::Arc;

    fn numbered(range: std::ops::RangeInclusive<usize>) -> String {
        range.map(|i| format!("line{}\n", i)).collect()
    }

    #[tokio::test]
    async fn test_head_default() {
        let (ctx, out) = ctx(&[], Some(&numbered(1..=15))).await;
        assert!(HeadCommand.execute(ctx).await.is_success());
        assert_eq!(out.contents(), numbered(1..=10));
    }

    #[tokio::test]
    async fn test_head_line_counts() {
        for args in [&["-n", "3"][..], &["-n3"][..], &["-3"][..]] {
            let (ctx, out) = ctx(args, Some(&numbered(1..=5))).await;
            HeadCommand.execute(ctx).await;
            assert_eq!(out.contents(), numbered(1..=3));
        }
    }

    #[tokio::test]
    async fn test_head_file() {
        let fs = Arc::new(InMemoryFs::with_files(&[("/f.txt", "a\nb\nc\n")]));
        let (ctx, out) = ctx_with(&["-n", "2", "/f.txt"], None, fs).await;
        assert!(HeadCommand.execute(ctx).await.is_success());
        assert_eq!(out.contents(), "a\nb\n");
    }

    #[tokio::test]
    async fn test_head_invalid_count() {
        let (ctx, _) = ctx(&["-n", "x"], None).await;
        let result = HeadCommand.execute(ctx).await;
        assert_eq!(result.status.as_deref(), Some("head: invalid number of lines: 'x'"));
    }
}
