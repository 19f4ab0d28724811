// src/commands/sort/mod.rs
use async_trait::async_trait;
use std::cmp::Ordering;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct SortCommand;

#[derive(Default)]
struct SortOptions {
    reverse: bool,
    numeric: bool,
    unique: bool,
}

/// Leading number of a line; lines without one sort as 0
fn leading_number(line: &str) -> f64 {
    let trimmed = line.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse().unwrap_or(0.0)
}

fn compare(a: &str, b: &str, opts: &SortOptions) -> Ordering {
    if opts.numeric {
        let by_number = leading_number(a)
            .partial_cmp(&leading_number(b))
            .unwrap_or(Ordering::Equal);
        if by_number != Ordering::Equal {
            return by_number;
        }
    }
    a.cmp(b)
}

#[async_trait]
impl Command for SortCommand {
    fn name(&self) -> &'static str {
        "sort"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut opts = SortOptions::default();
        let mut files: Vec<String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "--reverse" => opts.reverse = true,
                "--numeric-sort" => opts.numeric = true,
                "--unique" => opts.unique = true,
                "-" => files.push(arg.clone()),
                flags if flags.starts_with('-') => {
                    for flag in flags[1..].chars() {
                        match flag {
                            'r' => opts.reverse = true,
                            'n' => opts.numeric = true,
                            'u' => opts.unique = true,
                            other => {
                                return CommandResult::failure(format!("sort: invalid option -- '{}'", other))
                            }
                        }
                    }
                }
                _ => files.push(arg.clone()),
            }
        }

        let (content, errors) = ctx.read_operands("sort", &files).await;
        if !errors.is_empty() {
            return CommandResult::failure(errors.join("\n"));
        }

        let mut lines: Vec<&str> = content.lines().collect();
        lines.sort_by(|a, b| compare(a, b, &opts));
        if opts.unique {
            lines.dedup_by(|a, b| compare(a, b, &opts) == Ordering::Equal);
        }
        if opts.reverse {
            lines.reverse();
        }

        let mut output = lines.join("\n");
        if !output.is_empty() {
            output.push('\n');
        }
        match ctx.write(&output).await {
            Ok(()) => CommandResult::success(),
            Err(result) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::test_support::ctx;

    async fn sort(args: &[&str], stdin: &str) -> String {
        let (ctx, out) = ctx(args, Some(stdin)).await;
        assert!(SortCommand.execute(ctx).await.is_success());
        out.contents()
    }

    #[tokio::test]
    async fn test_sort_lexicographic() {
        assert_eq!(sort(&[], "banana\napple\ncherry\n").await, "apple\nbanana\ncherry\n");
    }

    #[tokio::test]
    async fn test_sort_numeric_and_reverse() {
        assert_eq!(sort(&["-n"], "10\n9\n-1\n100\n").await, "-1\n9\n10\n100\n");
        assert_eq!(sort(&["-rn"], "1\n3\n2\n").await, "3\n2\n1\n");
    }

    #[tokio::test]
    async fn test_sort_unique() {
        assert_eq!(sort(&["-u"], "b\na\nb\na\n").await, "a\nb\n");
    }

    #[tokio::test]
    async fn test_sort_empty_input() {
        assert_eq!(sort(&[], "").await, "");
    }

    #[tokio::test]
    async fn test_sort_missing_file() {
        let (ctx, _) = ctx(&["/nope"], None).await;
        let result = SortCommand.execute(ctx).await;
        assert_eq!(result.status.as_deref(), Some("sort: /nope: No such file or directory"));
    }
}
