//! Error types for the askdoc system

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the askdoc pipeline
///
/// Every failure a request can see falls into one of the first four kinds, so
/// callers can decide per-kind handling (reject invalid input outright, retry
/// an external service, and so on). `Configuration` and `Io` only occur during
/// construction and local file handling.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("ingestion error: {0}")]
    Ingestion(String),

    #[error("external service error: {0}")]
    ExternalService(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
