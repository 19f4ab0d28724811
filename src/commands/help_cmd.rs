use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};

pub struct HelpCommand;

const CATEGORIES: &[(&str, &[(&str, &str)])] = &[
    ("Text", &[
        ("echo", "print arguments, interpreting escapes (-n: no newline)"),
        ("cat", "print files or standard input"),
        ("grep", "print lines matching a pattern (-i -v -c -n -F)"),
        ("head", "print the first lines (-n N)"),
        ("sort", "sort lines (-r -n -u)"),
        ("wc", "count lines, words and bytes (-l -w -c)"),
    ]),
    ("Files", &[
        ("ls", "list directory contents (-a -1)"),
        ("mkdir", "create directories (-p -v)"),
        ("touch", "create empty files (-c)"),
        ("rm", "remove files or directories (-r -f -v)"),
    ]),
    ("Tests", &[
        ("test", "evaluate a condition, also written [ ... ]"),
        ("true", "do nothing, successfully"),
        ("false", "do nothing, unsuccessfully"),
    ]),
    ("Session", &[
        ("cd", "change the working directory"),
        ("pwd", "print the working directory"),
        ("env", "print the exported environment"),
        ("export", "export NAME=value to the environment"),
        ("unset", "remove variables"),
        ("set", "list variables and functions, or set NAME=VALUE"),
        ("exit", "leave the shell"),
        ("help", "show this list"),
    ]),
];

fn describe(name: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .flat_map(|(_, cmds)| cmds.iter())
        .find(|(cmd, _)| *cmd == name)
        .map(|(_, description)| *description)
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str { "help" }

    async fn execute(&self, ctx: CommandContext) -> CommandResult {
        let mut stdout = String::new();

        if ctx.args.is_empty() {
            stdout.push_str("Available commands:\n\n");
            for (category, cmds) in CATEGORIES {
                stdout.push_str(&format!("  {}:\n", category));
                for (cmd, description) in cmds.iter() {
                    stdout.push_str(&format!("    {:<8}{}\n", cmd, description));
                }
                stdout.push('\n');
            }
            stdout.push_str("Control flow: if/then/elif/else/fi, for/in/do/done, while/do/done, case/in/esac, function name() { ... }\n");
        } else {
            for name in &ctx.args {
                match describe(name) {
                    Some(description) => stdout.push_str(&format!("{}: {}\n", name, description)),
                    None => return CommandResult::failure(format!("help: no help topics match `{}'", name)),
                }
            }
        }

        match ctx.write(&stdout).await {
            Ok(()) => CommandResult::success(),
            Err(result) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::test_support::ctx;

    #[tokio::test]
    async fn test_help_lists_commands() {
        let (ctx, out) = ctx(&[], None).await;
        assert!(HelpCommand.execute(ctx).await.is_success());
        let text = out.contents();
        assert!(text.contains("Available commands"));
        assert!(text.contains("grep"));
        assert!(text.contains("export"));
    }

    #[tokio::test]
    async fn test_help_for_one_command() {
        let (ctx, out) = ctx(&["sort"], None).await;
        assert!(HelpCommand.execute(ctx).await.is_success());
        assert_eq!(out.contents(), "sort: sort lines (-r -n -u)\n");
    }

    #[tokio::test]
    async fn test_help_unknown_topic() {
        let (ctx, _) = ctx(&["nope"], None).await;
        let result = HelpCommand.execute(ctx).await;
        assert_eq!(result.status.as_deref(), Some("help: no help topics match `nope'"));
    }
}
