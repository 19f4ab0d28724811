//! exit - Exit shell builtin

use crate::interpreter::environment::Environment;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::types::ExecResult;

/// Handle the exit builtin command.
///
/// Without an argument the code is the last statement's. A non-numeric
/// argument is reported and the shell stays.
pub fn handle_exit(env: &Environment, args: &[String]) -> Result<ExecResult, InterpreterError> {
    let code = match args.first() {
        None => env.last_exit_code,
        Some(arg) => match arg.parse::<i32>() {
            Ok(parsed) => parsed.rem_euclid(256),
            Err(_) => {
                return Ok(ExecResult::failure(
                    "",
                    format!("sh: exit: {}: numeric argument required", arg),
                ))
            }
        },
    };
    Err(InterpreterError::exit(code))
}
