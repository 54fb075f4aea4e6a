//! CLI for hwdash: watch a remote machine's hardware from your terminal.

mod commands;
mod connectivity;
mod dashboard;
mod logging;
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hwdash")]
#[command(about = "hwdash: a live terminal view of a remote machine's hardware metrics")]
#[command(version = hwdash_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live full-screen dashboard (TUI), refreshed on a fixed cadence
    Monitor {
        /// Host running the metrics server (port 5000)
        #[arg(long, env = "HWDASH_HOST", default_value = "localhost")]
        host: String,

        /// Time between polls in milliseconds
        #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,

        /// Append logs to this file (stderr is taken by the dashboard)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Fetch one snapshot, print it and exit
    Fetch {
        /// Host running the metrics server (port 5000)
        #[arg(long, env = "HWDASH_HOST", default_value = "localhost")]
        host: String,

        /// Print the parsed snapshot as JSON instead of the rendered regions
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor {
            host,
            interval_ms,
            log_file,
        } => commands::monitor::run(&host, interval_ms, log_file.as_deref()),
        Commands::Fetch { host, json } => commands::fetch::run(&host, json),
    }
}
