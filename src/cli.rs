//! Command-line interface for connections.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Connections - group sixteen words into four hidden categories
#[derive(Parser, Debug)]
#[command(name = "connections")]
#[command(about = "Connections word game: puzzle server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Optional TOML file with host, port and db_path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST puzzle server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Create the schema and install the sample puzzle
    Seed {
        /// Drop every table first
        #[arg(long)]
        reset: bool,

        /// Path to the database file
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Validate a TOML puzzle definition and store it
    Create {
        /// Puzzle definition file
        file: PathBuf,

        /// Username of the author (created if missing)
        #[arg(long)]
        creator: String,

        /// Path to the database file
        #[arg(long, conflicts_with = "server_url")]
        db_path: Option<String>,

        /// Puzzle server URL; stores through the REST API instead of the file
        #[arg(long)]
        server_url: Option<String>,
    },

    /// Play in the terminal
    Play {
        /// Path to the database file
        #[arg(long, conflicts_with = "server_url")]
        db_path: Option<String>,

        /// Puzzle server URL; plays against a running server instead of the file
        #[arg(long)]
        server_url: Option<String>,

        /// Where to write logs while the terminal is in use
        #[arg(long, default_value = "connections_tui.log")]
        log_file: PathBuf,
    },
}
