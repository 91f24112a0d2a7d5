//! Error types for the Ollama adapter

use thiserror::Error;

/// Errors raised while talking to the generation API.
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("Cannot reach {url}: {source}")]
    Connect {
        url: String,
        source: reqwest::Error,
    },

    #[error("Server answered {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Failed to decode response body: {0}")]
    Decode(reqwest::Error),
}
