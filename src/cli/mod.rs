//! CLI commands

mod info;
mod keygen;
mod pull;
mod serve;

pub use info::info;
pub use keygen::keygen;
pub use pull::pull;
pub use serve::serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// minr - masked-LM compute miner
#[derive(Parser)]
#[command(name = "minr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the miner
    Serve(ServeArgs),

    /// Generate a miner key file
    Keygen {
        /// Key name
        #[arg(default_value = "nya-miner")]
        name: String,

        /// Output path (default: key directory + <name>.json)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Download model files from the Hugging Face hub
    Pull {
        /// Repository id (e.g. "distilbert/distilbert-base-uncased")
        model: String,

        /// Repository revision
        #[arg(long, default_value = "main")]
        revision: String,

        /// Output directory (default: model directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show model and key information
    Info {
        /// Model id or local directory
        #[arg(default_value = "distilbert/distilbert-base-uncased")]
        model: String,

        /// Key file to summarize
        #[arg(long)]
        keyfile: Option<String>,
    },
}

/// Arguments for `minr serve`
///
/// Flags override the configuration file; unset flags leave the file (or
/// built-in default) value in place.
#[derive(Args)]
pub struct ServeArgs {
    /// Key file name or path (created with `minr keygen`)
    #[arg(long, default_value = "nya-miner")]
    pub keyfile: String,

    /// Configuration file (YAML or JSON)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Miner name [default: nya compute miner]
    #[arg(long)]
    pub name: Option<String>,

    /// Host to bind to [default: 0.0.0.0]
    #[arg(long)]
    pub ip: Option<String>,

    /// Port to listen on [default: 9910]
    #[arg(long)]
    pub port: Option<u16>,

    /// Device to run on: cuda, cpu or auto [default: cuda]
    #[arg(long)]
    pub device: Option<String>,

    /// Prompts scored per forward pass [default: 64]
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Subnet uid to serve [default: 23]
    #[arg(long)]
    pub subnet_uid: Option<u16>,

    /// Model id or local directory [default: distilbert/distilbert-base-uncased]
    #[arg(long)]
    pub model: Option<String>,

    /// Model revision to fetch [default: main]
    #[arg(long)]
    pub revision: Option<String>,

    /// Padded token length per prompt [default: 512]
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Append served prompts to per-day JSONL files
    #[arg(long)]
    pub store_tasks: bool,
}
