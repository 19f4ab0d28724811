//! export - Export variables to the environment
//!
//! Supports:
//! - export - list exported variables
//! - export NAME=value - set and export
//! - export NAME - export the current value of a shell variable

use crate::interpreter::environment::Environment;
use crate::interpreter::types::ExecResult;

use super::is_valid_name;

/// Handle the export builtin command
pub fn handle_export(env: &mut Environment, args: &[String]) -> ExecResult {
    if args.is_empty() {
        let listing: Vec<String> = env
            .env
            .iter()
            .map(|(name, value)| format!("export {}=\"{}\"", name, value))
            .collect();
        return ExecResult::ok(listing.join("\n"));
    }

    let mut errors = Vec::new();
    for arg in args {
        let (name, value) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (arg.as_str(), None),
        };
        if !is_valid_name(name) {
            errors.push(format!("sh: export: `{}': not a valid identifier", arg));
            continue;
        }
        let value = value
            .or_else(|| env.get(name).map(str::to_string))
            .unwrap_or_default();
        env.export(name, value);
    }

    if errors.is_empty() {
        ExecResult::empty()
    } else {
        ExecResult::failure("", errors.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_export_assignment() {
        let mut env = Environment::new();
        assert!(handle_export(&mut env, &args(&["A=1", "B=two words"])).is_success());
        assert_eq!(env.env.get("A").map(String::as_str), Some("1"));
        assert_eq!(env.env.get("B").map(String::as_str), Some("two words"));
    }

    #[test]
    fn test_export_existing_variable() {
        let mut env = Environment::new();
        env.set("X", "42");
        handle_export(&mut env, &args(&["X"]));
        assert_eq!(env.env.get("X").map(String::as_str), Some("42"));
        assert!(env.variables.get("X").is_none());
    }

    #[test]
    fn test_export_invalid_name() {
        let mut env = Environment::new();
        let result = handle_export(&mut env, &args(&["1x=3"]));
        assert_eq!(result.status.as_deref(), Some("sh: export: `1x=3': not a valid identifier"));
    }

    #[test]
    fn test_export_listing() {
        let mut env = Environment::new();
        env.export("A", "1");
        assert_eq!(handle_export(&mut env, &[]).output, "export A=\"1\"");
    }
}
