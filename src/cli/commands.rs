use crate::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardwatch", about = "Trading card price spike watcher")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, env = "CARDWATCH_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the watchlist once, record prices and send alerts
    Run,
    /// Show the structured search candidates built for a free-text query
    Queries {
        text: String,
    },
    /// Print the stored price history of a card
    History {
        /// Card name or slug
        name: String,
        /// Only rows from the last N days
        #[arg(long)]
        days: Option<u32>,
    },
    /// Rebuild the price panel from stored history
    Panel,
    /// Send a health-check message
    Ping,
}
