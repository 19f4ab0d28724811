// src/commands/echo/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

/// `echo [-n] [-e|-E] args...`. Escape sequences are interpreted unless
/// `-E` is given.
pub struct EchoCommand;

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let args = &ctx.args;
        let mut no_newline = false;
        let mut interpret_escapes = true;
        let mut start_index = 0;

        while start_index < args.len() {
            match args[start_index].as_str() {
                "-n" => no_newline = true,
                "-e" => interpret_escapes = true,
                "-E" => interpret_escapes = false,
                "-ne" | "-en" => {
                    no_newline = true;
                    interpret_escapes = true;
                }
                _ => break,
            }
            start_index += 1;
        }

        let mut output = args[start_index..].join(" ");

        if interpret_escapes {
            let escaped = process_escapes(&output);
            output = escaped.output;
            if escaped.stop {
                no_newline = true;
            }
        }

        if !no_newline {
            output.push('\n');
        }

        match ctx.write(&output).await {
            Ok(()) => CommandResult::success(),
            Err(result) => result,
        }
    }
}

struct EscapeResult {
    output: String,
    /// `\c` was seen: drop the rest and the trailing newline
    stop: bool,
}

fn process_escapes(input: &str) -> EscapeResult {
    let mut result = String::with_capacity(input.len());
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' || i + 1 >= chars.len() {
            result.push(chars[i]);
            i += 1;
            continue;
        }

        let next = chars[i + 1];
        i += 2;
        match next {
            '\\' => result.push('\\'),
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            'a' => result.push('\x07'),
            'b' => result.push('\x08'),
            'f' => result.push('\x0c'),
            'v' => result.push('\x0b'),
            'e' | 'E' => result.push('\x1b'),
            'c' => {
                return EscapeResult { output: result, stop: true };
            }
            '0' => {
                // \0NNN, up to three octal digits
                let start = i;
                while i < chars.len() && i < start + 3 && ('0'..='7').contains(&chars[i]) {
                    i += 1;
                }
                let octal: String = chars[start..i].iter().collect();
                let code = u32::from_str_radix(&octal, 8).unwrap_or(0) % 256;
                if let Some(c) = char::from_u32(code) {
                    result.push(c);
                }
            }
            'x' => {
                let start = i;
                while i < chars.len() && i < start + 2 && chars[i].is_ascii_hexdigit() {
                    i += 1;
                }
                if start == i {
                    result.push_str("\\x");
                } else {
                    let hex: String = chars[start..i].iter().collect();
                    let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
                    if let Some(c) = char::from_u32(code) {
                        result.push(c);
                    }
                }
            }
            _ => {
                result.push('\\');
                result.push(next);
            }
        }
    }

    EscapeResult { output: result, stop: false }
}
