mod analyzer;
mod cli;
mod config;
mod rules;
mod scan_engine;
mod scanner;
mod symbol_table;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use anyhow::Result;

use cli::Command;

/// Go Logging Convention Linter
///
/// Checks structured-logging calls (slog, zap) for message conventions
/// and sensitive-data leaks. Human-readable output by default.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit JSON instead of human-readable markdown
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // diagnostics go to stderr; stdout is reserved for results
    let level = args.log_level.parse::<Level>().unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    cli::handle_command(args.command, args.json)
}
