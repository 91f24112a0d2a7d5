//! Ollama-compatible generation API adapter
//!
//! - [`client`] — reqwest-based gateway: catalog fetch and the streaming
//!   generate call, with a background reader task feeding the codec.
//! - [`codec`] — incremental newline-delimited JSON decoding.
//! - [`error`] — adapter error types.

pub mod client;
pub mod codec;
pub mod error;
