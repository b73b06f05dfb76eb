mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "tourbook")]
#[command(about = "Browse the event calendar and route searches from the terminal")]
struct Cli {
    /// Read events from this JSON file instead of the configured one
    #[arg(long, global = true)]
    events: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month calendar with event markers
    Calendar {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List the events on one day
    Day {
        /// Day to look up (YYYY-MM-DD)
        date: String,
    },
    /// Print which collection a search phrase is routed to
    Route {
        phrase: Vec<String>,
    },
    /// Route a search phrase and list matching events
    Search {
        phrase: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::load(cli.events)?;

    match cli.command {
        Commands::Calendar { month } => commands::calendar::run(&ctx, month.as_deref()),
        Commands::Day { date } => commands::day::run(&ctx, &date),
        Commands::Route { phrase } => commands::route::run(&ctx, &phrase.join(" ")),
        Commands::Search { phrase } => commands::search::run(&ctx, &phrase.join(" ")),
    }
}
