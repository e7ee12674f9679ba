use anyhow::Result;
use clap::Parser;
use commandalias_core::commands::{self, ConsoleSender};
use commandalias_core::{CommandAlias, FileStore};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Custom command aliases, backed by a TOML config file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the alias config. Created with defaults if it doesn't exist.
    #[arg(short, long, default_value = "CommandAlias.toml")]
    config: PathBuf,

    /// Arguments for `/ca`, e.g. `reload` or `toggle <label>`. Without any, a
    /// console is read from stdin.
    args: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "commandalias.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("COMMANDALIAS_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let mut plugin = CommandAlias::enable(FileStore::new(&args.config));

    if !args.args.is_empty() {
        let ca_args: Vec<&str> = args.args.iter().map(String::as_str).collect();
        commands::execute(&mut plugin, &ConsoleSender, &ca_args);
        return Ok(());
    }

    info!("Reading commands from stdin. Use `ca <args>` for admin commands.");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(label) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        if label.eq_ignore_ascii_case("ca") {
            commands::execute(&mut plugin, &ConsoleSender, &rest);
            continue;
        }

        let matched = plugin.matching(label);
        if matched.is_empty() {
            println!("No alias matches '{label}'.");
        }
        for alias in matched {
            for command in alias.console_commands() {
                println!("[{}] {}", alias.label(), command);
            }
        }
    }
    Ok(())
}
