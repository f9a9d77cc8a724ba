//! Headless self-play runner.
//!
//! Runs agent-vs-agent matches on the standard map without graphics.
//!
//! # Usage
//!
//! ```bash
//! # A 60-turn self-play match with the default tables
//! cargo run -p riverwar_headless -- run --turns 60
//!
//! # Custom agent tables, JSON summaries on stdout
//! cargo run -p riverwar_headless -- run --config tables.ron --json
//! ```
//!
//! Logs go to stderr; summaries go to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use riverwar_agent::config::AgentConfig;
use riverwar_headless::{MatchError, MatchRunner};

#[derive(Parser)]
#[command(name = "riverwar_headless")]
#[command(about = "Headless self-play runner for agent testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single self-play match
    Run {
        /// Number of turns to play
        #[arg(short, long, default_value = "60")]
        turns: u32,

        /// Agent configuration RON file (defaults to the built-in tables)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit per-turn summaries as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        turns: 60,
        config: None,
        json: false,
    });

    match command {
        Commands::Run {
            turns,
            config,
            json,
        } => match run_match(turns, config, json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_match(turns: u32, config: Option<PathBuf>, json: bool) -> Result<(), MatchError> {
    let config = match config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };

    let report = MatchRunner::new(config, turns)?.run()?;

    if json {
        for summary in &report.summaries {
            if let Ok(line) = serde_json::to_string(summary) {
                println!("{line}");
            }
        }
    }

    match report.winner {
        Some(player) => println!(
            "match over after {} turns: player {player} razed the enemy castle",
            report.turns_played
        ),
        None => println!(
            "match over after {} turns: both castles stand",
            report.turns_played
        ),
    }
    Ok(())
}
