// src/commands/env/mod.rs
use async_trait::async_trait;
use std::collections::BTreeMap;
use crate::commands::{Command, CommandContext, CommandResult};

/// `env [-i] [-u NAME] [NAME=VALUE]...`: print the exported environment,
/// sorted by name, with the requested changes applied
pub struct EnvCommand;

#[async_trait]
impl Command for EnvCommand {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let args = &ctx.args;
        let mut env: BTreeMap<String, String> = ctx.env.clone().into_iter().collect();

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if arg == "-i" || arg == "--ignore-environment" {
                env.clear();
            } else if arg == "-u" && i + 1 < args.len() {
                i += 1;
                env.remove(&args[i]);
            } else if let Some(name) = arg.strip_prefix("--unset=") {
                env.remove(name);
            } else if let Some((name, value)) = arg.split_once('=') {
                env.insert(name.to_string(), value.to_string());
            } else if arg.starts_with('-') {
                return CommandResult::failure(format!("env: invalid option '{}'", arg));
            } else {
                return CommandResult::failure(format!("env: '{}': running commands is not supported", arg));
            }
            i += 1;
        }

        let output: String = env
            .iter()
            .map(|(key, value)| format!("{}={}\n", key, value))
            .collect();
        match ctx.write(&output).await {
            Ok(()) => CommandResult::success(),
            Err(result) => result,
        }
    }
}
