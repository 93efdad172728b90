//! Error types for the Upsilon core.

use thiserror::Error;

use crate::tag::AlgorithmFamily;

/// Errors that can occur while selecting, invoking, or decoding algorithms.
///
/// Verification outcomes are not errors: a bad signature is `false` and a
/// worthless proof of work has difficulty zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("unsupported {family} algorithm: {tag:#06x}")]
    UnsupportedAlgorithm { family: AlgorithmFamily, tag: u16 },

    #[error("{family} algorithm {tag:#06x} cannot generate fresh key material")]
    AlgorithmNotGeneratable { family: AlgorithmFamily, tag: u16 },

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("output too large: requested {requested} bytes, maximum is {max}")]
    OutputTooLarge { requested: usize, max: usize },

    #[error("invalid proof length: expected {expected}, got {actual}")]
    InvalidProofLength { expected: usize, actual: usize },

    #[error("invalid {what} length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("salt length {len} outside [{min}, {max}]")]
    InvalidSaltLength { len: usize, min: usize, max: usize },

    #[error("keystream exhausted")]
    KeystreamExhausted,
}

impl CryptoError {
    /// Shorthand for an [`UnsupportedAlgorithm`](Self::UnsupportedAlgorithm)
    /// error on any tag type.
    pub fn unsupported<T: crate::tag::AlgorithmTag>(tag: T) -> Self {
        CryptoError::UnsupportedAlgorithm {
            family: T::FAMILY,
            tag: tag.to_u16(),
        }
    }

    /// Shorthand for an
    /// [`AlgorithmNotGeneratable`](Self::AlgorithmNotGeneratable) error.
    pub fn not_generatable<T: crate::tag::AlgorithmTag>(tag: T) -> Self {
        CryptoError::AlgorithmNotGeneratable {
            family: T::FAMILY,
            tag: tag.to_u16(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
