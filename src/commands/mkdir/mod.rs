// src/commands/mkdir/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{FsError, MkdirOptions};

pub struct MkdirCommand;

#[async_trait]
impl Command for MkdirCommand {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut recursive = false;
        let mut verbose = false;
        let mut dirs: Vec<String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "-p" | "--parents" => recursive = true,
                "-v" | "--verbose" => verbose = true,
                _ if !arg.starts_with('-') => dirs.push(arg.clone()),
                _ => return CommandResult::failure(format!("mkdir: invalid option '{}'", arg)),
            }
        }

        if dirs.is_empty() {
            return CommandResult::failure("mkdir: missing operand");
        }

        let mut errors: Vec<String> = Vec::new();
        let options = MkdirOptions { recursive };

        for dir in &dirs {
            let path = ctx.resolve(dir);
            match ctx.fs.mkdir(&path, &options).await {
                Ok(()) => {
                    if verbose {
                        if let Err(result) = ctx.writeln(&format!("mkdir: created directory '{}'", dir)).await {
                            return result;
                        }
                    }
                }
                Err(e) => {
                    let reason = match e {
                        FsError::NotFound { .. } => "No such file or directory".to_string(),
                        FsError::AlreadyExists { .. } => "File exists".to_string(),
                        FsError::NotDirectory { .. } => "Not a directory".to_string(),
                        other => other.to_string(),
                    };
                    errors.push(format!("mkdir: cannot create directory '{}': {}", dir, reason));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::test_support::ctx_with;
    use crate::fs::{FileSystem, InMemoryFs};
    use std::sync::Arc;

    async fn mkdir(fs: Arc<InMemoryFs>, args: &[&str]) -> (CommandResult, String) {
        let (ctx, out) = ctx_with(args, None, fs).await;
        let result = MkdirCommand.execute(ctx).await;
        (result, out.contents())
    }

    #[tokio::test]
    async fn test_mkdir_creates_directories() {
        let fs = Arc::new(InMemoryFs::new());
        let (result, out) = mkdir(fs.clone(), &["/a", "b"]).await;
        assert!(result.is_success());
        assert_eq!(out, "");
        assert!(fs.stat("/a").await.unwrap().is_directory);
        assert!(fs.stat("/b").await.unwrap().is_directory);
    }

    #[tokio::test]
    async fn test_mkdir_parents_and_verbose() {
        let fs = Arc::new(InMemoryFs::new());
        let (result, out) = mkdir(fs.clone(), &["-p", "-v", "/x/y/z"]).await;
        assert!(result.is_success());
        assert_eq!(out, "mkdir: created directory '/x/y/z'\n");
        assert!(fs.exists("/x/y").await);
    }

    #[tokio::test]
    async fn test_mkdir_errors() {
        let fs = Arc::new(InMemoryFs::with_files(&[("/file.txt", "x")]));
        let (result, _) = mkdir(fs.clone(), &["/missing/dir"]).await;
        assert_eq!(
            result.status.as_deref(),
            Some("mkdir: cannot create directory '/missing/dir': No such file or directory")
        );
        let (result, _) = mkdir(fs.clone(), &["/file.txt"]).await;
        assert_eq!(
            result.status.as_deref(),
            Some("mkdir: cannot create directory '/file.txt': File exists")
        );
        let (result, _) = mkdir(fs, &[]).await;
        assert_eq!(result.status.as_deref(), Some("mkdir: missing operand"));
    }
}
