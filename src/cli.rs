//! Command-line interface for voicebridge
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Voice-session segmentation and assistant pipeline
#[derive(Parser, Debug)]
#[command(
    name = "voicebridge",
    version,
    about = "Voice-session segmentation and assistant pipeline"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress transcript/reply output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSONL event script through the segmenter and assistant
    Replay {
        /// Event script path, or "-" for stdin
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Use mock providers instead of live HTTP APIs
        #[arg(long)]
        offline: bool,

        /// Silence timeout override (default: 5s). Examples: 5s, 1500ms
        #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
        silence_timeout: Option<Duration>,
    },
    /// Print a sample event script to stdout
    Sample,
}

/// Parse a human-friendly duration string (`5s`, `1500ms`, `1m30s`).
fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| format!("invalid duration '{}': {}", s, e))
}
