use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "sofra-server")]
#[command(
    author,
    version,
    about = "Turkish food recognition API",
    long_about = None
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Hugging Face model repository
    #[arg(short, long, env = "SOFRA_MODEL")]
    pub model: Option<String>,

    /// Load the model from a local directory instead of the Hub
    #[arg(long, conflicts_with = "model")]
    pub model_dir: Option<PathBuf>,

    /// Hugging Face revision (branch, tag or commit)
    #[arg(long)]
    pub revision: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
