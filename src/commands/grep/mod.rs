// src/commands/grep/mod.rs
use async_trait::async_trait;
use regex_lite::Regex;
use crate::commands::{Command, CommandContext, CommandResult};

/// Status of a search that selected no lines
pub const NO_MATCH_STATUS: &str = "false";

pub struct GrepCommand;

#[derive(Default)]
struct GrepOptions {
    pattern: String,
    ignore_case: bool,
    invert_match: bool,
    count_only: bool,
    line_number: bool,
    fixed_strings: bool,
    files: Vec<String>,
}

fn parse_grep_args(args: &[String]) -> Result<GrepOptions, String> {
    let mut opts = GrepOptions::default();
    let mut pattern: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-e" if i + 1 < args.len() => {
                i += 1;
                pattern = Some(args[i].clone());
            }
            "-i" | "--ignore-case" => opts.ignore_case = true,
            "-v" | "--invert-match" => opts.invert_match = true,
            "-c" | "--count" => opts.count_only = true,
            "-n" | "--line-number" => opts.line_number = true,
            "-F" | "--fixed-strings" => opts.fixed_strings = true,
            "-E" | "--extended-regexp" => {}
            "-" => positional.push(arg.clone()),
            // Combined short flags such as -in
            flags if flags.starts_with('-') && flags.len() > 1 => {
                for flag in flags[1..].chars() {
                    match flag {
                        'i' => opts.ignore_case = true,
                        'v' => opts.invert_match = true,
                        'c' => opts.count_only = true,
                        'n' => opts.line_number = true,
                        'F' => opts.fixed_strings = true,
                        'E' => {}
                        other => return Err(format!("grep: invalid option -- '{}'", other)),
                    }
                }
            }
            _ => positional.push(arg.clone()),
        }
        i += 1;
    }

    opts.pattern = match pattern {
        Some(p) => p,
        None if !positional.is_empty() => positional.remove(0),
        None => return Err("grep: no pattern specified".to_string()),
    };
    opts.files = positional;
    Ok(opts)
}

fn build_regex(opts: &GrepOptions) -> Result<Regex, String> {
    let mut pattern = if opts.fixed_strings {
        regex_lite::escape(&opts.pattern)
    } else {
        opts.pattern.clone()
    };
    if opts.ignore_case {
        pattern = format!("(?i){}", pattern);
    }
    Regex::new(&pattern).map_err(|e| format!("grep: invalid pattern: {}", e))
}

/// Lines of one input selected by the options, with their 1-based numbers
fn select_lines<'a>(content: &'a str, regex: &Regex, invert: bool) -> Vec<(usize, &'a str)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| regex.is_match(line) != invert)
        .map(|(i, line)| (i + 1, line))
        .collect()
}

#[async_trait]
impl Command for GrepCommand {
    fn name(&self) -> &'static str {
        "grep"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let opts = match parse_grep_args(&ctx.args) {
            Ok(o) => o,
            Err(e) => return CommandResult::failure(e),
        };
        let regex = match build_regex(&opts) {
            Ok(r) => r,
            Err(e) => return CommandResult::failure(e),
        };

        let files = if opts.files.is_empty() {
            vec!["-".to_string()]
        } else {
            opts.files.clone()
        };
        let show_filename = files.len() > 1;

        let mut output = String::new();
        let mut errors: Vec<String> = Vec::new();
        let mut matched_any = false;

        for file in &files {
            let content = match ctx.read_operand(file).await {
                Ok(c) => c,
                Err(e) => {
                    errors.push(format!("grep: {}", e));
                    continue;
                }
            };

            let selected = select_lines(&content, &regex, opts.invert_match);
            matched_any |= !selected.is_empty();
            let label = if file == "-" { "(standard input)" } else { file.as_str() };

            if opts.count_only {
                if show_filename {
                    output.push_str(&format!("{}:{}\n", label, selected.len()));
                } else {
                    output.push_str(&format!("{}\n", selected.len()));
                }
                continue;
            }

            for (number, line) in selected {
                if show_filename {
                    output.push_str(label);
                    output.push(':');
                }
                if opts.line_number {
                    output.push_str(&format!("{}:", number));
                }
                output.push_str(line);
                output.push('\n');
            }
        }

        if let Err(result) = ctx.write(&output).await {
            return result;
        }
        if !errors.is_empty() {
            return CommandResult::failure(errors.join("\n"));
        }
        if matched_any {
            CommandResult::success()
        } else {
            CommandResult::failure(NO_MATCH_STATUS)
        }
    }
}
