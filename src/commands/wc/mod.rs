// src/commands/wc/mod.rs
use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct WcCommand;

#[derive(Default, Clone, Copy)]
struct Stats {
    lines: usize,
    words: usize,
    bytes: usize,
}

impl Stats {
    fn of(content: &str) -> Self {
        Self {
            lines: content.matches('\n').count(),
            words: content.split_whitespace().count(),
            bytes: content.len(),
        }
    }

    fn add(&mut self, other: &Stats) {
        self.lines += other.lines;
        self.words += other.words;
        self.bytes += other.bytes;
    }
}

#[derive(Clone, Copy)]
struct Columns {
    lines: bool,
    words: bool,
    bytes: bool,
}

fn format_row(stats: &Stats, columns: Columns, width: usize, label: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if columns.lines {
        parts.push(format!("{:>width$}", stats.lines, width = width));
    }
    if columns.words {
        parts.push(format!("{:>width$}", stats.words, width = width));
    }
    if columns.bytes {
        parts.push(format!("{:>width$}", stats.bytes, width = width));
    }
    let mut row = parts.join(" ");
    if let Some(label) = label {
        row.push(' ');
        row.push_str(label);
    }
    row
}

#[async_trait]
impl Command for WcCommand {
    fn name(&self) -> &'static str {
        "wc"
    }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut columns = Columns { lines: false, words: false, bytes: false };
        let mut files: Vec<String> = Vec::new();

        for arg in &ctx.args {
            match arg.as_str() {
                "-l" | "--lines" => columns.lines = true,
                "-w" | "--words" => columns.words = true,
                "-c" | "--bytes" => columns.bytes = true,
                "-" => files.push(arg.clone()),
                flags if flags.starts_with('-') => {
                    for flag in flags[1..].chars() {
                        match flag {
                            'l' => columns.lines = true,
                            'w' => columns.words = true,
                            'c' => columns.bytes = true,
                            other => {
                                return CommandResult::failure(format!("wc: invalid option -- '{}'", other))
                            }
                        }
                    }
                }
                _ => files.push(arg.clone()),
            }
        }

        if !columns.lines && !columns.words && !columns.bytes {
            columns = Columns { lines: true, words: true, bytes: true };
        }
        if files.is_empty() {
            files.push("-".to_string());
        }

        let mut rows: Vec<(Stats, Option<String>)> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        for file in &files {
            match ctx.read_operand(file).await {
                Ok(content) => {
                    let label = if file == "-" { None } else { Some(file.clone()) };
                    rows.push((Stats::of(&content), label));
                }
                Err(e) => errors.push(format!("wc: {}", e)),
            }
        }

        let mut total = Stats::default();
        for (stats, _) in &rows {
            total.add(stats);
        }
        let single_column = [columns.lines, columns.words, columns.bytes]
            .iter()
            .filter(|c| **c)
            .count()
            == 1;
        let width = if single_column && rows.len() <= 1 {
            0
        } else {
            total.bytes.max(total.words).max(total.lines).to_string().len()
        };

        let mut output = String::new();
        for (stats, label) in &rows {
            output.push_str(&format_row(stats, columns, width, label.as_deref()));
            output.push('\n');
        }
        if rows.len() > 1 {
            output.push_str(&format_row(&total, columns, width, Some("total")));
            output.push('\n');
        }

        if let Err(result) = ctx.write(&output).await {
            return result;
        }
        if errors.is_empty() {
            CommandResult::success()
        } else {
            CommandResult::failure(errors.join("\n"))
        }
    }
}
