//! Registry errors

use kycledger_core::CoreError;
use kycledger_store::StoreError;
use thiserror::Error;

/// Errors from registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Incorrect number of arguments for {operation}. Need {expected}, got {actual}")]
    ArgumentCount {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Encoding error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Malformed row in {table}: {reason}")]
    MalformedRow { table: String, reason: String },

    #[error("Provisioning failed: {0}")]
    Provisioning(String),
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    pub fn malformed(table: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    /// Check a caller-supplied argument list before touching any state
    pub fn check_args(operation: &str, args: &[String], expected: usize) -> RegistryResult<()> {
        if args.len() != expected {
            return Err(Self::ArgumentCount {
                operation: operation.to_string(),
                expected,
                actual: args.len(),
            });
        }
        Ok(())
    }

    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::ArgumentCount { .. })
    }

    /// True for inserts rejected because the key already exists
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Store(StoreError::DuplicateKey { .. }))
    }
}
