use std::path::PathBuf;

use clap::Parser;

/// quip: send one message to Claude and print the reply.
///
/// Reads `ANTHROPIC_API_KEY` from the environment or a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "quip", version, about)]
pub struct Args {
    /// Settings file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// `.env` file to load instead of `./.env` and the config-dir `.env`.
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Log filter directive override (e.g. `debug`, `quip_ai=trace`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
