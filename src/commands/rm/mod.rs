// src/commands/rm/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{FsError, RmOptions};

pub struct RmCommand;

#[async_trait]
impl Command for RmCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut recursive = false;
        let mut force = false;
        let mut verbose = false;
        let mut paths: Vec<String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "--recursive" => recursive = true,
                "--force" => force = true,
                "--verbose" => verbose = true,
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    for flag in arg[1..].chars() {
                        match flag {
                            'r' | 'R' => recursive = true,
                            'f' => force = true,
                            'v' => verbose = true,
                            _ => return CommandResult::failure(format!("rm: invalid option -- '{}'", flag)),
                        }
                    }
                }
                _ => paths.push(arg.clone()),
            }
        }

        if paths.is_empty() {
            if force {
                return CommandResult::success();
            }
            return CommandResult::failure("rm: missing operand");
        }

        let mut errors: Vec<String> = Vec::new();
        for path in &paths {
            let resolved = ctx.resolve(path);
            let is_directory = match ctx.fs.stat(&resolved).await {
                Ok(stat) => stat.is_directory,
                Err(_) if force => continue,
                Err(_) => {
                    errors.push(format!("rm: cannot remove '{}': No such file or directory", path));
                    continue;
                }
            };
            if is_directory && !recursive {
                errors.push(format!("rm: cannot remove '{}': Is a directory", path));
                continue;
            }

            match ctx.fs.rm(&resolved, &RmOptions { recursive, force }).await {
                Ok(()) => {
                    if verbose {
                        if let Err(result) = ctx.writeln(&format!("removed '{}'", path)).await {
                            return result;
                        }
                    }
                }
                Err(FsError::NotEmpty { .. }) => {
                    errors.push(format!("rm: cannot remove '{}': Directory not empty", path));
                }
                Err(e) => errors.push(format!("rm: cannot remove '{}': {}", path, e)),
            }
        }

        if errors.is_empty() {
            CommandResult::success()
        } else {
            CommandResult::failure(errors.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::test_support::ctx_with;
    use crate::fs::{FileSystem, InMemoryFs};
    use std::sync::Arc;

    fn sample_fs() -> Arc<InMemoryFs> {
        Arc::new(InMemoryFs::with_files(&[
            ("/a.txt", "a"),
            ("/b.txt", "b"),
            ("/dir/inner.txt", "x"),
        ]))
    }

    async fn rm(fs: Arc<InMemoryFs>, args: &[&str]) -> (CommandResult, String) {
        let (ctx, out) = ctx_with(args, None, fs).await;
        let result = RmCommand.execute(ctx).await;
        (result, out.contents())
    }

    #[tokio::test]
    async fn test_rm_files() {
        let fs = sample_fs();
        let (result, out) = rm(fs.clone(), &["-v", "/a.txt", "b.txt"]).await;
        assert!(result.is_success());
        assert_eq!(out, "removed '/a.txt'\nremoved 'b.txt'\n");
        assert!(!fs.exists("/a.txt").await);
        assert!(!fs.exists("/b.txt").await);
    }

    #[tokio::test]
    async fn test_rm_directory_needs_recursive() {
        let fs = sample_fs();
        let (result, _) = rm(fs.clone(), &["/dir"]).await;
        assert_eq!(result.status.as_deref(), Some("rm: cannot remove '/dir': Is a directory"));
        assert!(fs.exists("/dir/inner.txt").await);

        let (result, _) = rm(fs.clone(), &["-rf", "/dir"]).await;
        assert!(result.is_success());
        assert!(!fs.exists("/dir").await);
    }

    #[tokio::test]
    async fn test_rm_missing() {
        let fs = sample_fs();
        let (result, _) = rm(fs.clone(), &["/nope"]).await;
        assert_eq!(
            result.status.as_deref(),
            Some("rm: cannot remove '/nope': No such file or directory")
        );
        let (result, _) = rm(fs.clone(), &["-f", "/nope"]).await;
        assert!(result.is_success());
        let (result, _) = rm(fs, &[]).await;
        assert_eq!(result.status.as_deref(), Some("rm: missing operand"));
    }
}
