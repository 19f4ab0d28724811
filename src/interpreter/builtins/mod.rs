//! Builtin Commands
//!
//! Builtins that change session state and therefore run on the
//! interpreter's own `Environment` instead of as pipeline stages:
//! `cd`, `export`, `unset`, `set` and `exit`.

pub mod cd_cmd;
pub mod exit_cmd;
pub mod export_cmd;
pub mod set_cmd;
pub mod unset_cmd;

pub use cd_cmd::handle_cd;
pub use exit_cmd::handle_exit;
pub use export_cmd::handle_export;
pub use set_cmd::handle_set;
pub use unset_cmd::handle_unset;

use crate::fs::FileSystem;
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::types::ExecResult;

pub const STATE_BUILTINS: &[&str] = &["cd", "export", "unset", "set", "exit"];

pub fn is_state_builtin(name: &str) -> bool {
    STATE_BUILTINS.contains(&name)
}

/// Shell identifier: letter or underscore, then letters, digits, underscores
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Run a state builtin; `None` when `name` is not one
pub async fn dispatch(
    name: &str,
    env: &mut Environment,
    fs: &dyn FileSystem,
    args: &[String],
) -> Option<Result<ExecResult, InterpreterError>> {
    let result = match name {
        "cd" => Ok(handle_cd(env, fs, args).await),
        "export" => Ok(handle_export(env, args)),
        "unset" => Ok(handle_unset(env, args)),
        "set" => Ok(handle_set(env, args)),
        "exit" => handle_exit(env, args),
        _ => return None,
    };
    Some(result)
}
