//! Store errors

use thiserror::Error;

/// Errors from a ledger store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Table already exists: {0}")]
    TableExists(String),

    #[error("Column mismatch on {table}: {reason}")]
    ColumnMismatch { table: String, reason: String },

    #[error("Key arity mismatch on {table}: expected {expected} key columns, got {actual}")]
    KeyArity {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("Row already exists in {table} with key {key}")]
    DuplicateKey { table: String, key: String },

    #[error("No row in {table} with key {key}")]
    MissingKey { table: String, key: String },

    #[error("A transaction is already active")]
    TransactionActive,

    #[error("No active transaction")]
    NoTransaction,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn duplicate_key(table: &str, key: &str) -> Self {
        Self::DuplicateKey {
            table: table.to_string(),
            key: key.to_string(),
        }
    }

    pub fn missing_key(table: &str, key: &str) -> Self {
        Self::MissingKey {
            table: table.to_string(),
            key: key.to_string(),
        }
    }

    pub fn column_mismatch(table: &str, reason: impl Into<String>) -> Self {
        Self::ColumnMismatch {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}
