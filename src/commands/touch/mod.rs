// src/commands/touch/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::FsError;

pub struct TouchCommand;

#[async_trait]
impl Command for TouchCommand {
    fn name(&self) -> &'static str {
        "touch"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut no_create = false;
        let mut files: Vec<String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "-c" | "--no-create" => no_create = true,
                _ if !arg.starts_with('-') => files.push(arg.clone()),
                _ => return CommandResult::failure(format!("touch: invalid option '{}'", arg)),
            }
        }

        if files.is_empty() {
            return CommandResult::failure("touch: missing file operand");
        }

        let mut errors: Vec<String> = Vec::new();
        for file in &files {
            let path = ctx.resolve(file);
            // No timestamps are tracked, so an existing path is left alone
            if no_create || ctx.fs.exists(&path).await {
                continue;
            }
            if let Err(e) = ctx.fs.write_file(&path, &[]).await {
                let reason = match e {
                    FsError::NotFound { .. } => "No such file or directory".to_string(),
                    FsError::IsDirectory { .. } => "Is a directory".to_string(),
                    other => other.to_string(),
                };
                errors.push(format!("touch: cannot touch '{}': {}", file, reason));
            }
        }

        if errors.is_empty() {
            CommandResult::success()
        } else {
            CommandResult::failure(errors.join("\n"))
        }
    }
}
