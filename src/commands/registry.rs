// src/commands/registry.rs
use std::collections::HashMap;
use std::sync::Arc;
use super::types::Command;

/// Name → command table consulted for every pipeline stage
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Arc<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Shared handle to a command, for running it on its own task
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use super::cat::CatCommand;
use super::echo::EchoCommand;
use super::env::EnvCommand;
use super::grep::GrepCommand;
use super::head::HeadCommand;
use super::help_cmd::HelpCommand;
use super::ls::LsCommand;
use super::mkdir::MkdirCommand;
use super::pwd::PwdCommand;
use super::rm::RmCommand;
use super::sort::SortCommand;
use super::test_cmd::{BracketCommand, TestCommand};
use super::touch::TouchCommand;
use super::true_cmd::{FalseCommand, TrueCommand};
use super::wc::WcCommand;

/// Text commands: the ones that read stdin or files
pub fn register_text_commands(registry: &mut CommandRegistry) {
    registry.register(Arc::new(EchoCommand));
    registry.register(Arc::new(CatCommand));
    registry.register(Arc::new(GrepCommand));
    registry.register(Arc::new(HeadCommand));
    registry.register(Arc::new(SortCommand));
    registry.register(Arc::new(WcCommand));
}

/// File commands working through the session filesystem
pub fn register_file_commands(registry: &mut CommandRegistry) {
    registry.register(Arc::new(LsCommand));
    registry.register(Arc::new(MkdirCommand));
    registry.register(Arc::new(TouchCommand));
    registry.register(Arc::new(RmCommand));
}

/// Tests and session information
pub fn register_session_commands(registry: &mut CommandRegistry) {
    registry.register(Arc::new(TestCommand));
    registry.register(Arc::new(BracketCommand));
    registry.register(Arc::new(TrueCommand));
    registry.register(Arc::new(FalseCommand));
    registry.register(Arc::new(PwdCommand));
    registry.register(Arc::new(EnvCommand));
    registry.register(Arc::new(HelpCommand));
}

/// Registry with every builtin command
pub fn create_default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_text_commands(&mut registry);
    register_file_commands(&mut registry);
    register_session_commands(&mut registry);
    registry
}
