//! set - List or assign shell variables
//!
//! Supports:
//! - set - list variables, then functions
//! - set NAME=VALUE - assign
//! - set NAME = VALUE - assign, spelled as three words

use crate::interpreter::environment::Environment;
use crate::interpreter::types::ExecResult;

use super::is_valid_name;

const USAGE: &str = "sh: set: usage: set NAME=VALUE";

/// Handle the set builtin command
pub fn handle_set(env: &mut Environment, args: &[String]) -> ExecResult {
    match args {
        [] => ExecResult::ok(listing(env)),
        [name, eq, value] if eq == "=" => assign(env, name, value),
        [single] => match single.split_once('=') {
            Some((name, value)) => assign(env, name, value),
            None => ExecResult::failure("", USAGE),
        },
        _ => ExecResult::failure("", USAGE),
    }
}

fn assign(env: &mut Environment, name: &str, value: &str) -> ExecResult {
    if !is_valid_name(name) {
        return ExecResult::failure("", format!("sh: set: `{}': not a valid identifier", name));
    }
    env.set(name, value);
    ExecResult::empty()
}

fn listing(env: &Environment) -> String {
    let variables = env
        .variables
        .iter()
        .map(|(name, value)| format!("{}={}", name, value));
    let functions = env
        .functions
        .iter()
        .map(|(name, body)| format!("{}() {{ {} }}", name, body));
    variables.chain(functions).collect::<Vec<_>>().join("\n")
}
