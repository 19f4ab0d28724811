//! unset - Remove variables/functions builtin
//!
//! Supports:
//! - unset NAME... - remove variables (shell and exported)
//! - unset -f NAME... - remove functions

use crate::interpreter::environment::Environment;
use crate::interpreter::types::ExecResult;

/// Handle the unset builtin command
pub fn handle_unset(env: &mut Environment, args: &[String]) -> ExecResult {
    let mut functions = false;
    for arg in args {
        match arg.as_str() {
            "-f" => functions = true,
            "-v" => functions = false,
            name if functions => {
                env.functions.shift_remove(name);
            }
            name => {
                env.unset(name);
            }
        }
    }
    ExecResult::empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variables() {
        let mut env = Environment::with_defaults();
        env.set("a", "1");
        handle_unset(&mut env, &["a".to_string(), "USER".to_string()]);
        assert_eq!(env.get("a"), None);
        assert_eq!(env.get("USER"), None);
    }

    #[test]
    fn test_unset_function() {
        let mut env = Environment::new();
        env.define_function("f", "echo hi");
        env.set("f", "value");
        handle_unset(&mut env, &["-f".to_string(), "f".to_string()]);
        assert!(!env.has_function("f"));
        assert_eq!(env.get("f"), Some("value"));
    }
}
