//! # Bass Math
//!
//! Numerical building blocks for Bass diffusion estimation.
//! This crate provides an ordinary least squares solver with the usual
//! inference statistics and closed-form evaluation of the Bass curve.

use thiserror::Error;

pub mod diffusion;
pub mod regression;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;

pub use diffusion::{bass_cdf, bass_density, peak_time, quadratic_roots};
pub use regression::{CoefficientStats, OlsFit, OlsRegression};
