//! Error types for the bass_diffusion crate

use bass_math::MathError;
use thiserror::Error;

/// Custom error types for the bass_diffusion crate
#[derive(Debug, Error)]
pub enum BassError {
    /// Input file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input file has an unsupported extension
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Malformed rows, columns or numbers in the input
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Too few observations (or too little variation) to identify the regression
    #[error("Underdetermined fit: {0}")]
    UnderdeterminedFit(String),

    /// Fit does not correspond to a valid Bass parameterization
    #[error("Domain error: {0}")]
    DomainError(String),

    /// Error from invalid parameters or call order
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON export
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error while formatting text output
    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, BassError>;

impl From<MathError> for BassError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) | MathError::SingularMatrix(msg) => {
                BassError::UnderdeterminedFit(msg)
            }
            MathError::DomainError(msg) => BassError::DomainError(msg),
            MathError::InvalidInput(msg) | MathError::CalculationError(msg) => {
                BassError::InvalidParameter(msg)
            }
        }
    }
}

impl From<csv::Error> for BassError {
    fn from(err: csv::Error) -> Self {
        BassError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for BassError {
    fn from(err: serde_json::Error) -> Self {
        BassError::SerializationError(err.to_string())
    }
}
