//! Error types for the facade.

use thiserror::Error;
use upsilon_core::CryptoError;

/// Errors from configuring or using [`Upsilon`](crate::Upsilon).
#[derive(Debug, Error)]
pub enum UpsilonError {
    /// A primitive or decoding failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The configuration could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but selects something unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, UpsilonError>;
