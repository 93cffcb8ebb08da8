//! cmdtree demo host.
//!
//! Registers the sample commands and dispatches lines against them:
//! - `tp <x> [y]`: teleport, `y` defaults to 0
//! - `feature [on|off]`: show or toggle the demo feature
//! - `echo <text...>`: print the rest of the line
//!
//! Lines come from `--exec` (repeatable) or, when none are given, stdin.

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use cmdtree_dsl::BuilderConfig;
use cmdtree_testkit::Dispatcher;

mod commands;

#[derive(Parser)]
#[command(
    name = "cmdtree",
    about = "Dispatch command lines against declared command trees",
    version
)]
struct Cli {
    /// Run this line instead of reading stdin (may be repeated)
    #[arg(short, long = "exec", value_name = "LINE")]
    exec: Vec<String>,

    /// Name of the invoking source
    #[arg(short, long, default_value = "console")]
    source: String,

    /// Builder configuration file
    #[arg(short, long, value_name = "PATH", default_value = "cmdtree.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = BuilderConfig::load_from(&cli.config)?;
    let mut dispatcher = Dispatcher::new();
    commands::register(&mut dispatcher, &config)?;
    tracing::info!(commands = dispatcher.roots().len(), "Commands registered");

    let mut failures = 0usize;
    if cli.exec.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            failures += usize::from(!run_line(&dispatcher, line, &cli.source));
        }
    } else {
        for line in &cli.exec {
            failures += usize::from(!run_line(&dispatcher, line, &cli.source));
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} command(s) failed");
    }
    Ok(())
}

/// Dispatch one line, reporting the outcome. Returns whether it succeeded.
fn run_line(dispatcher: &Dispatcher<String>, line: &str, source: &str) -> bool {
    match dispatcher.execute(line, source.to_string()) {
        Ok(result) => {
            tracing::debug!(line, result, "Command finished");
            true
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}
