// src/commands/mod.rs
pub mod cat;
pub mod echo;
pub mod env;
pub mod grep;
pub mod head;
pub mod help_cmd;
pub mod ls;
pub mod mkdir;
pub mod pwd;
pub mod registry;
pub mod rm;
pub mod sort;
pub mod test_cmd;
pub mod touch;
pub mod true_cmd;
pub mod types;
pub mod wc;

pub use registry::{create_default_registry, CommandRegistry};
pub use types::{Command, CommandContext, CommandResult};
