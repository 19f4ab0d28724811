//! Word Expansion
//!
//! Turns argument tokens into strings:
//! - single-quoted text is taken as written
//! - a whole-token reference (`$name`, `${name}`, `$1`, `$#`, `$?`, `$@`) is
//!   replaced by its value
//! - `$(( expr ))` is evaluated by the arithmetic evaluator
//! - any other text has embedded references substituted in place
//!
//! An unresolved reference follows the session's `ExpansionPolicy`: kept as
//! written (`Literal`) or dropped (`Empty`).

use lazy_static::lazy_static;
use regex_lite::{Captures, Regex};

use crate::interpreter::arithmetic::{arithmetic_body, evaluate, format_number};
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::types::ExpansionPolicy;
use crate::parser::lexer::{Token, TokenKind};

lazy_static! {
    static ref REFERENCE: Regex = Regex::new(
        r"\$\(\((?:[^()]|\([^()]*\))*\)\)|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*|[0-9]+|[#?@])"
    )
    .expect("invalid reference pattern");
}

/// Value of a variable reference, including the special `$?`
pub fn lookup(env: &Environment, name: &str) -> Option<String> {
    if name == "?" {
        return Some(env.last_exit_code.to_string());
    }
    env.get(name).map(str::to_string)
}

fn unresolved(written: &str, policy: ExpansionPolicy) -> String {
    match policy {
        ExpansionPolicy::Literal => written.to_string(),
        ExpansionPolicy::Empty => String::new(),
    }
}

/// Evaluate the body of `$(( ... ))`
pub fn expand_arithmetic(env: &Environment, body: &str) -> Result<String, InterpreterError> {
    let value = evaluate(body, |name| lookup(env, name))?;
    Ok(format_number(value))
}

/// Substitute every reference embedded in `text`
pub fn interpolate(
    env: &Environment,
    policy: ExpansionPolicy,
    text: &str,
) -> Result<String, InterpreterError> {
    if !text.contains('$') {
        return Ok(text.to_string());
    }

    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for caps in REFERENCE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        result.push_str(&text[last..whole.start()]);
        result.push_str(&expand_reference(env, policy, &caps)?);
        last = whole.end();
    }
    result.push_str(&text[last..]);
    Ok(result)
}

fn expand_reference(
    env: &Environment,
    policy: ExpansionPolicy,
    caps: &Captures<'_>,
) -> Result<String, InterpreterError> {
    let written = caps.get(0).map_or("", |m| m.as_str());
    if let Some(body) = arithmetic_body(written) {
        return expand_arithmetic(env, body);
    }
    let name = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str());
    Ok(lookup(env, name).unwrap_or_else(|| unresolved(written, policy)))
}

/// Expand one argument token
pub fn expand_token(
    env: &Environment,
    policy: ExpansionPolicy,
    token: &Token,
) -> Result<String, InterpreterError> {
    if token.is_single_quoted() {
        return Ok(token.value.clone());
    }
    match token.kind {
        TokenKind::Variable => {
            let name = token.name.as_deref().unwrap_or("");
            Ok(lookup(env, name).unwrap_or_else(|| unresolved(&token.raw, policy)))
        }
        TokenKind::Arithmetic => match arithmetic_body(&token.value) {
            Some(body) => expand_arithmetic(env, body),
            None => Ok(token.value.clone()),
        },
        TokenKind::Assignment => {
            // Passed as an argument (`export A=$x`): keep the NAME= prefix
            let name = token.name.as_deref().unwrap_or("");
            Ok(format!("{}={}", name, expand_assignment_value(env, policy, token)?))
        }
        _ => interpolate(env, policy, &token.value),
    }
}

/// Expand every token of an argument list
pub fn expand_tokens(
    env: &Environment,
    policy: ExpansionPolicy,
    tokens: &[Token],
) -> Result<Vec<String>, InterpreterError> {
    tokens.iter().map(|t| expand_token(env, policy, t)).collect()
}

/// Right-hand side of `name=value`
pub fn expand_assignment_value(
    env: &Environment,
    policy: ExpansionPolicy,
    token: &Token,
) -> Result<String, InterpreterError> {
    if token.is_single_quoted() {
        return Ok(token.value.clone());
    }
    if token.quote.is_none() {
        if let Some(body) = arithmetic_body(&token.value) {
            return expand_arithmetic(env, body);
        }
    }
    interpolate(env, policy, &token.value)
}

/// Values of a `for` loop: an unquoted whole-token reference is split on
/// whitespace so `for x in $list` iterates over each word
pub fn expand_for_values(
    env: &Environment,
    policy: ExpansionPolicy,
    tokens: &[Token],
) -> Result<Vec<String>, InterpreterError> {
    let mut values = Vec::new();
    for token in tokens {
        let expanded = expand_token(env, policy, token)?;
        if token.kind == TokenKind::Variable {
            values.extend(expanded.split_whitespace().map(str::to_string));
        } else {
            values.push(expanded);
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn env() -> Environment {
        let mut env = Environment::new();
        env.set("a", "10");
        env.set("name", "world");
        env.set("list", "x y  z");
        env.last_exit_code = 1;
        env
    }

    fn expand(input: &str, policy: ExpansionPolicy) -> Vec<String> {
        expand_tokens(&env(), policy, &tokenize(input)).unwrap()
    }

    #[test]
    fn test_whole_token_variable() {
        assert_eq!(expand("$a ${name} $?", ExpansionPolicy::Literal), vec!["10", "world", "1"]);
    }

    #[test]
    fn test_embedded_references() {
        assert_eq!(expand(r#""hi, $name !""#, ExpansionPolicy::Literal), vec!["hi, world !"]);
        assert_eq!(expand("file_${a}.txt", ExpansionPolicy::Literal), vec!["file_10.txt"]);
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(expand("'$a'", ExpansionPolicy::Literal), vec!["$a"]);
    }

    #[test]
    fn test_unresolved_policy() {
        assert_eq!(expand("$missing", ExpansionPolicy::Literal), vec!["$missing"]);
        assert_eq!(expand("$missing", ExpansionPolicy::Empty), vec![""]);
        assert_eq!(expand(r#""x${missing}y""#, ExpansionPolicy::Literal), vec!["x${missing}y"]);
        assert_eq!(expand(r#""x${missing}y""#, ExpansionPolicy::Empty), vec!["xy"]);
    }

    #[test]
    fn test_arithmetic_token() {
        assert_eq!(expand("$((a+1))", ExpansionPolicy::Literal), vec!["11"]);
        assert_eq!(expand(r#""sum=$((a*2))""#, ExpansionPolicy::Literal), vec!["sum=20"]);
    }

    #[test]
    fn test_arithmetic_error_propagates() {
        let tokens = tokenize("$((a/0))");
        assert!(expand_tokens(&env(), ExpansionPolicy::Literal, &tokens).is_err());
    }

    #[test]
    fn test_assignment_value() {
        let env = env();
        let tokens = tokenize("b=$((a+5))");
        assert_eq!(expand_assignment_value(&env, ExpansionPolicy::Literal, &tokens[0]).unwrap(), "15");
        let tokens = tokenize("b=\"$name!\"");
        assert_eq!(expand_assignment_value(&env, ExpansionPolicy::Literal, &tokens[0]).unwrap(), "world!");
        let tokens = tokenize("b='$name'");
        assert_eq!(expand_assignment_value(&env, ExpansionPolicy::Literal, &tokens[0]).unwrap(), "$name");
    }

    #[test]
    fn test_assignment_as_argument() {
        assert_eq!(expand("export B=$a", ExpansionPolicy::Literal), vec!["export", "B=10"]);
    }

    #[test]
    fn test_for_values_split_variables() {
        let values = expand_for_values(&env(), ExpansionPolicy::Literal, &tokenize("$list \"p q\"")).unwrap();
        assert_eq!(values, vec!["x", "y", "z", "p q"]);
    }
}
