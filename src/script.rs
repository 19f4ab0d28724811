//! Script Assembly
//!
//! Splits script text into logical statements. Lines that open a block
//! (`if`, `for`, `while`, `case`, `{`) are collected with the following lines
//! until the matching closer, then joined into a single line the parser can
//! read. Blank lines and `#` comment lines are skipped.

use crate::parser::lexer::{tokenize, TokenKind};

/// Line endings after which the next line continues without a separator
const OPEN_ENDINGS: &[&str] = &["then", "do", "else", "in", "{"];

/// Net block depth change contributed by one line
fn depth_delta(line: &str) -> i32 {
    tokenize(line)
        .iter()
        .map(|token| match token.kind {
            TokenKind::FunctionStart => 1,
            TokenKind::FunctionEnd => -1,
            TokenKind::Keyword => match token.value.as_str() {
                "if" | "for" | "while" | "case" => 1,
                "fi" | "done" | "esac" => -1,
                _ => 0,
            },
            _ => 0,
        })
        .sum()
}

fn ends_with_word(line: &str, word: &str) -> bool {
    match line.strip_suffix(word) {
        Some(rest) => word == "{" || rest.is_empty() || !rest.ends_with(|c: char| c.is_alphanumeric() || c == '_'),
        None => false,
    }
}

/// Append one block line to the statement being assembled
fn push_block_line(block: &mut String, line: &str) {
    block.push_str(line);
    if line.ends_with(';') {
        return;
    }
    if OPEN_ENDINGS.iter().any(|word| ends_with_word(line, word)) {
        block.push(' ');
    } else {
        block.push(';');
    }
}

/// Logical statements of a script, in order
pub fn logical_lines(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut block = String::new();
    let mut depth = 0i32;

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let delta = depth_delta(line);
        if depth == 0 && delta <= 0 {
            statements.push(line.to_string());
            continue;
        }

        push_block_line(&mut block, line);
        depth = (depth + delta).max(0);
        if depth == 0 {
            statements.push(std::mem::take(&mut block).trim_end().to_string());
        }
    }

    if !block.is_empty() {
        tracing::debug!(depth, "script ended inside an open block");
        statements.push(block.trim_end().to_string());
    }
    statements
}
