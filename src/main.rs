use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tiny_sh::fs::HostFs;
use tiny_sh::{CancelToken, ExecResult, ScriptResult, Shell, ShellConfig, ShellOptions};

const PROMPT: &str = "shell > ";
const LOG_ENV: &str = "TINY_SH_LOG";

#[derive(Parser)]
#[command(name = "tiny-sh")]
#[command(about = "A small shell-like command language")]
#[command(version)]
struct Cli {
    /// Execute the command string and exit
    #[arg(short = 'c')]
    command: Option<String>,

    /// TOML file with cwd, [env], [limits] and unresolved_variables
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Print results as JSON (output, status, success)
    #[arg(long = "json")]
    json: bool,

    /// Log interpreter activity to stderr
    #[arg(long = "debug")]
    debug: bool,

    /// Script file to execute
    #[arg()]
    script: Option<String>,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Trip `cancel` on Ctrl-C until the returned task is aborted
fn watch_interrupt(cancel: CancelToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            cancel.cancel();
        }
    })
}

fn report(output: &str, status: Option<&str>, success: bool, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "output": output,
                "status": status,
                "success": success,
            })
        );
    } else if !output.is_empty() {
        println!("{}", output);
    }
}

async fn run_command(shell: &mut Shell, command: &str, json: bool) -> i32 {
    let watcher = watch_interrupt(shell.cancel_token());
    let result: ExecResult = shell.exec(command).await;
    watcher.abort();
    report(&result.output, result.status.as_deref(), result.is_success(), json);
    if result.is_success() { 0 } else { 1 }
}

async fn run_script(shell: &mut Shell, path: &str, json: bool) -> i32 {
    let watcher = watch_interrupt(shell.cancel_token());
    let outcome = shell.run_file(path).await;
    watcher.abort();
    let result: ScriptResult = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("tiny-sh: cannot read script: {}", e);
            return 1;
        }
    };
    report(&result.output, result.last_failure.as_deref(), result.is_success(), json);
    if result.is_success() { 0 } else { 1 }
}

async fn repl(shell: &mut Shell) -> i32 {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("tiny-sh: cannot start line editor: {}", e);
            return 1;
        }
    };
    println!("tiny-sh {} - type `help` for commands, `exit` to quit", env!("CARGO_PKG_VERSION"));

    loop {
        let line = tokio::task::block_in_place(|| editor.readline(PROMPT));
        match line {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                let watcher = watch_interrupt(shell.cancel_token());
                let result = shell.exec(&line).await;
                watcher.abort();
                if !result.output.is_empty() {
                    println!("{}", result.output);
                }
                if shell.has_exited() {
                    println!("Exiting shell...");
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("Exiting shell...");
                break;
            }
            Err(e) => {
                eprintln!("tiny-sh: {}", e);
                return 1;
            }
        }
    }
    0
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = match cli.config.as_deref().map(ShellConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("tiny-sh: {}", e);
            std::process::exit(2);
        }
    };

    let mut options: ShellOptions = config.into_options().with_fs(Arc::new(HostFs::new()));
    if options.cwd.is_none() {
        if let Ok(dir) = std::env::current_dir() {
            options.cwd = Some(dir.to_string_lossy().to_string());
        }
    }
    let mut shell = Shell::new(options).await;

    let code = if let Some(command) = cli.command {
        run_command(&mut shell, &command, cli.json).await
    } else if let Some(path) = cli.script {
        run_script(&mut shell, &path, cli.json).await
    } else {
        repl(&mut shell).await
    };

    std::process::exit(code);
}
