//! Core domain errors

use thiserror::Error;

/// Errors raised while interpreting stored KYC values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid date '{0}', expected format like '15 Mar 2024'")]
    InvalidDate(String),

    #[error("Invalid KYC status: {0}")]
    InvalidStatus(String),
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
