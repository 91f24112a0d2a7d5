//! Presentation layer for glyphcast
//!
//! This crate contains the CLI definition, the interactive chat REPL (the
//! coordinating context that applies all UI events), and console art
//! formatting.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplOptions};
pub use cli::commands::Cli;
pub use output::console::ConsoleArt;
