//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No text provided")]
    EmptyInput,

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
