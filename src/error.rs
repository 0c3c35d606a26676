//! Error handling and custom error types
//!
//! Provides unified error handling across the relay using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Method Not Allowed")]
    InvalidMethod,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether the caller is at fault, as opposed to the relay or the provider.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMethod | Error::InvalidRequest(_) | Error::PayloadTooLarge(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
