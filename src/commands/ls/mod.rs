// src/commands/ls/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{DirEntry, FsError};

pub struct LsCommand;

#[async_trait]
impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut show_all = false;
        let mut one_per_line = false;
        let mut paths: Vec<String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "-a" | "--all" => show_all = true,
                "-1" => one_per_line = true,
                "-a1" | "-1a" => {
                    show_all = true;
                    one_per_line = true;
                }
                _ if !arg.starts_with('-') => paths.push(arg.clone()),
                _ => return CommandResult::failure(format!("ls: invalid option '{}'", arg)),
            }
        }

        if paths.is_empty() {
            paths.push(".".to_string());
        }

        let separator = if one_per_line { "\n" } else { "\t" };
        let mut sections: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for path in &paths {
            let resolved = ctx.resolve(path);
            let entries = match ctx.fs.readdir(&resolved).await {
                Ok(entries) => entries,
                Err(FsError::NotDirectory { .. }) => {
                    sections.push(path.clone());
                    continue;
                }
                Err(FsError::NotFound { .. }) => {
                    errors.push(format!(
                        "ls: cannot access '{}': No such file or directory",
                        path
                    ));
                    continue;
                }
                Err(e) => {
                    errors.push(format!("ls: cannot open directory '{}': {}", path, e));
                    continue;
                }
            };

            let listing = format_entries(&entries, show_all, separator);
            if paths.len() > 1 {
                sections.push(format!("{}:\n{}", path, listing));
            } else {
                sections.push(listing);
            }
        }

        let mut output = sections.join(if paths.len() > 1 { "\n\n" } else { "\n" });
        if !output.is_empty() {
            output.push('\n');
        }
        if let Err(result) = ctx.write(&output).await {
            return result;
        }

        if errors.is_empty() {
            CommandResult::success()
        } else {
            CommandResult::failure(errors.join("\n"))
        }
    }
}

/// Directories are marked with a trailing `/`; dotfiles only with `-a`
fn format_entries(entries: &[DirEntry], show_all: bool, separator: &str) -> String {
    entries
        .iter()
        .filter(|entry| show_all || !entry.name.starts_with('.'))
        .map(|entry| {
            if entry.is_directory {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}
