// src/commands/types.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::fs::{FileSystem, FsError};
use crate::interpreter::types::is_truthy;
use crate::io::{IoStream, StreamError};

/// Command result. Output goes to `stdout`; the status follows the shell's
/// convention: absent, `""` or `"0"` is success, any other text is a failure
/// and is shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub status: Option<String>,
}

impl CommandResult {
    pub fn success() -> Self {
        Self { status: None }
    }

    pub fn failure(status: impl Into<String>) -> Self {
        Self { status: Some(status.into()) }
    }

    pub fn is_success(&self) -> bool {
        is_truthy(self.status.as_deref())
    }
}

impl From<StreamError> for CommandResult {
    fn from(err: StreamError) -> Self {
        CommandResult::failure(err.to_string())
    }
}

/// Command execution context
pub struct CommandContext {
    pub args: Vec<String>,
    pub stdin: Arc<dyn IoStream>,
    pub stdout: Arc<dyn IoStream>,
    pub cwd: String,
    /// Exported environment
    pub env: HashMap<String, String>,
    pub fs: Arc<dyn FileSystem>,
}

impl CommandContext {
    /// Write to stdout, turning a broken pipe into a failed result
    pub async fn write(&self, data: &str) -> Result<(), CommandResult> {
        self.stdout.write(data).await.map_err(CommandResult::from)
    }

    pub async fn writeln(&self, data: &str) -> Result<(), CommandResult> {
        self.stdout.writeln(data).await.map_err(CommandResult::from)
    }

    /// Read all remaining stdin
    pub async fn read_stdin(&self) -> Result<String, CommandResult> {
        self.stdin.read_to_string().await.map_err(CommandResult::from)
    }

    /// Absolute path for a command argument
    pub fn resolve(&self, path: &str) -> String {
        self.fs.resolve_path(&self.cwd, path)
    }

    /// Content of a file operand, `-` meaning stdin. The error is the
    /// message a command prints after its own name.
    pub async fn read_operand(&self, file: &str) -> Result<String, String> {
        if file == "-" {
            return self.stdin.read_to_string().await.map_err(|e| e.to_string());
        }
        match self.fs.read_file(&self.resolve(file)).await {
            Ok(content) => Ok(content),
            Err(FsError::IsDirectory { .. }) => Err(format!("{}: Is a directory", file)),
            Err(FsError::NotFound { .. }) => Err(format!("{}: No such file or directory", file)),
            Err(e) => Err(format!("{}: {}", file, e)),
        }
    }

    /// Content of every operand in order, stdin when there are none.
    /// Unreadable operands are reported and skipped.
    pub async fn read_operands(&self, name: &str, files: &[String]) -> (String, Vec<String>) {
        if files.is_empty() {
            return match self.read_operand("-").await {
                Ok(content) => (content, Vec::new()),
                Err(e) => (String::new(), vec![format!("{}: {}", name, e)]),
            };
        }
        let mut content = String::new();
        let mut errors = Vec::new();
        for file in files {
            match self.read_operand(file).await {
                Ok(text) => content.push_str(&text),
                Err(e) => errors.push(format!("{}: {}", name, e)),
            }
        }
        (content, errors)
    }
}

/// Command trait
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    async fn execute(&self, ctx: CommandContext) -> CommandResult;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::fs::InMemoryFs;
    use crate::io::{CaptureStream, Pipe};

    /// Context with captured stdout and optional stdin text
    pub async fn ctx_with(
        args: &[&str],
        stdin: Option<&str>,
        fs: Arc<dyn FileSystem>,
    ) -> (CommandContext, Arc<CaptureStream>) {
        let stdout = Arc::new(CaptureStream::new());
        let input = Arc::new(Pipe::new());
        if let Some(text) = stdin {
            input.write(text).await.unwrap();
        }
        input.close();
        let ctx = CommandContext {
            args: args.iter().map(|s| s.to_string()).collect(),
            stdin: input,
            stdout: stdout.clone(),
            cwd: "/".to_string(),
            env: HashMap::new(),
            fs,
        };
        (ctx, stdout)
    }

    pub async fn ctx(args: &[&str], stdin: Option<&str>) -> (CommandContext, Arc<CaptureStream>) {
        ctx_with(args, stdin, Arc::new(InMemoryFs::new())).await
    }
}
