//! Infrastructure layer for glyphcast
//!
//! Adapters implementing the application ports: the Ollama-compatible HTTP
//! gateway with its newline-delimited JSON codec, the built-in block font
//! renderer, the animated GIF exporter, and the configuration loader.

pub mod config;
pub mod export;
pub mod ollama;
pub mod render;

// Re-export commonly used types
pub use config::{file_config::FileConfig, loader::ConfigLoader};
pub use export::gif::GifFrameExporter;
pub use ollama::{client::OllamaGateway, codec::ChunkParser, error::OllamaError};
pub use render::block_font::BlockFontRenderer;
