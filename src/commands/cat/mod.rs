// src/commands/cat/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct CatCommand;

#[async_trait]
impl Command for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut show_line_numbers = false;
        let mut files: Vec<String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "-n" | "--number" => show_line_numbers = true,
                _ if !arg.starts_with('-') || arg == "-" => files.push(arg.clone()),
                _ => {}
            }
        }

        if files.is_empty() {
            files.push("-".to_string());
        }

        let mut errors: Vec<String> = Vec::new();
        let mut line_number = 1;

        for file in &files {
            // Plain stdin is copied chunk by chunk as it arrives
            if file == "-" && !show_line_numbers {
                if let Err(result) = copy_stdin(&ctx).await {
                    return result;
                }
                continue;
            }

            let content = match ctx.read_operand(file).await {
                Ok(c) => c,
                Err(e) => {
                    errors.push(format!("cat: {}", e));
                    continue;
                }
            };

            let text = if show_line_numbers {
                let (numbered, next_line) = add_line_numbers(&content, line_number);
                line_number = next_line;
                numbered
            } else {
                content
            };
            if let Err(result) = ctx.write(&text).await {
                return result;
            }
        }

        if errors.is_empty() {
            CommandResult::success()
        } else {
            CommandResult::failure(errors.join("\n"))
        }
    }
}

async fn copy_stdin(ctx: &CommandContext) -> Result<(), CommandResult> {
    loop {
        match ctx.stdin.read().await {
            Ok(Some(chunk)) => ctx.write(&chunk).await?,
            Ok(None) => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }
}

fn add_line_numbers(content: &str, start_line: usize) -> (String, usize) {
    let mut result = String::with_capacity(content.len());
    let mut count = 0;
    for line in content.lines() {
        result.push_str(&format!("{:>6}\t{}\n", start_line + count, line));
        count += 1;
    }
    if !content.is_empty() && !content.ends_with('\n') {
        result.pop();
    }
    (result, start_line + count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::test_support::{ctx, ctx_with};
    use crate::fs::InMemoryFs;
    use std::sync::Arc;

    async fn cat_files(args: &[&str], files: &[(&str, &str)]) -> (CommandResult, String) {
        let fs = Arc::new(InMemoryFs::with_files(files));
        let (ctx, out) = ctx_with(args, None, fs).await;
        let result = CatCommand.execute(ctx).await;
        (result, out.contents())
    }

    #[tokio::test]
    async fn test_cat_single_file() {
        let (result, out) = cat_files(&["/test.txt"], &[("/test.txt", "hello world\n")]).await;
        assert!(result.is_success());
        assert_eq!(out, "hello world\n");
    }

    #[tokio::test]
    async fn test_cat_multiple_files() {
        let (_, out) = cat_files(&["/a.txt", "/b.txt"], &[("/a.txt", "aaa\n"), ("/b.txt", "bbb\n")]).await;
        assert_eq!(out, "aaa\nbbb\n");
    }

    #[tokio::test]
    async fn test_cat_with_line_numbers() {
        let (_, out) = cat_files(&["-n", "/test.txt"], &[("/test.txt", "line1\nline2\n")]).await;
        assert_eq!(out, "     1\tline1\n     2\tline2\n");
    }

    #[tokio::test]
    async fn test_cat_file_not_found() {
        let (result, _) = cat_files(&["/nonexistent.txt"], &[]).await;
        assert_eq!(
            result.status.as_deref(),
            Some("cat: /nonexistent.txt: No such file or directory")
        );
    }

    #[tokio::test]
    async fn test_cat_stdin() {
        let (ctx, out) = ctx(&[], Some("from stdin\n")).await;
        let result = CatCommand.execute(ctx).await;
        assert!(result.is_success());
        assert_eq!(out.contents(), "from stdin\n");
    }
}
