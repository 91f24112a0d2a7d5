//! Command-line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Block-letter art studio with a chat against a local generation API
#[derive(Parser, Debug)]
#[command(name = "glyphcast", version, about)]
pub struct Cli {
    /// Text to render once and exit (starts the interactive REPL when
    /// omitted)
    pub text: Option<String>,

    /// Font face for rendered art
    #[arg(long)]
    pub font: Option<String>,

    /// In one-shot mode, also export the art as an animated GIF
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Generation API base URL (default: http://localhost:11434)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Default chat model (otherwise the first catalog entry is used)
    #[arg(long)]
    pub model: Option<String>,

    /// Disable the live shadow animation
    #[arg(long)]
    pub no_animation: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore config files and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
