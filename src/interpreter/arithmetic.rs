//! Arithmetic Evaluation
//!
//! Evaluates the body of `$(( expr ))` with a small dedicated evaluator:
//! - numbers (integer or decimal)
//! - identifiers and `$name` references, looked up as variables (unset → 0)
//! - binary `+ - * /`, unary `+ -`, parentheses
//!
//! Nothing else is accepted. Values are `f64`; integral results print
//! without a fractional part.

use crate::interpreter::errors::ArithmeticError;

#[derive(Debug, Clone, PartialEq)]
enum ArithToken {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Result<Vec<ArithToken>, ArithmeticError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).map_or(false, |d| d.is_ascii_digit())) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ArithmeticError::new(expr, format!("invalid number `{}'", text)))?;
            tokens.push(ArithToken::Number(value));
        } else if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let start = if c == '$' { i + 1 } else { i };
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            if name.is_empty() {
                return Err(ArithmeticError::new(expr, "syntax error: operand expected"));
            }
            tokens.push(ArithToken::Ident(name));
        } else if matches!(c, '+' | '-' | '*' | '/') {
            tokens.push(ArithToken::Op(c));
            i += 1;
        } else if c == '(' {
            tokens.push(ArithToken::LParen);
            i += 1;
        } else if c == ')' {
            tokens.push(ArithToken::RParen);
            i += 1;
        } else {
            return Err(ArithmeticError::new(
                expr,
                format!("syntax error: invalid arithmetic operator `{}'", c),
            ));
        }
    }
    Ok(tokens)
}

struct Evaluator<'a, F: Fn(&str) -> Option<String>> {
    expr: &'a str,
    tokens: Vec<ArithToken>,
    pos: usize,
    lookup: F,
}

impl<'a, F: Fn(&str) -> Option<String>> Evaluator<'a, F> {
    fn error(&self, message: &str) -> ArithmeticError {
        ArithmeticError::new(self.expr, message)
    }

    fn peek(&self) -> Option<&ArithToken> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<ArithToken> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    // expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.parse_term()?;
        while let Some(ArithToken::Op(op @ ('+' | '-'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.parse_term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.parse_factor()?;
        while let Some(ArithToken::Op(op @ ('*' | '/'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.parse_factor()?;
            if op == '*' {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(self.error("division by 0"));
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    // factor := ('+' | '-') factor | NUMBER | IDENT | '(' expr ')'
    fn parse_factor(&mut self) -> Result<f64, ArithmeticError> {
        match self.next() {
            Some(ArithToken::Op('-')) => Ok(-self.parse_factor()?),
            Some(ArithToken::Op('+')) => self.parse_factor(),
            Some(ArithToken::Number(n)) => Ok(n),
            Some(ArithToken::Ident(name)) => self.variable(&name),
            Some(ArithToken::LParen) => {
                let value = self.parse_expr()?;
                match self.next() {
                    Some(ArithToken::RParen) => Ok(value),
                    _ => Err(self.error("missing `)'")),
                }
            }
            Some(ArithToken::RParen) | Some(ArithToken::Op(_)) | None => {
                Err(self.error("syntax error: operand expected"))
            }
        }
    }

    fn variable(&self, name: &str) -> Result<f64, ArithmeticError> {
        match (self.lookup)(name) {
            None => Ok(0.0),
            Some(value) if value.trim().is_empty() => Ok(0.0),
            Some(value) => value
                .trim()
                .parse::<f64>()
                .map_err(|_| self.error(&format!("`{}' is not a number ({}={})", value, name, value))),
        }
    }
}

/// Evaluate an arithmetic expression, resolving names through `lookup`
pub fn evaluate<F>(expr: &str, lookup: F) -> Result<f64, ArithmeticError>
where
    F: Fn(&str) -> Option<String>,
{
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Ok(0.0);
    }
    let mut evaluator = Evaluator { expr, tokens, pos: 0, lookup };
    let value = evaluator.parse_expr()?;
    if evaluator.pos < evaluator.tokens.len() {
        return Err(evaluator.error("syntax error in expression"));
    }
    Ok(value)
}

/// Render a result: `4` rather than `4.0`, `2.5` stays `2.5`
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Body of a `$(( ... ))` token, if the text is one
pub fn arithmetic_body(text: &str) -> Option<&str> {
    text.strip_prefix("$((")
        .and_then(|rest| rest.strip_suffix("))"))
}
