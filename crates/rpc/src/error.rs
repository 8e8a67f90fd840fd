//! RPC errors

use kycledger_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type RpcResult<T> = Result<T, RpcError>;

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        Self::Registry(RegistryError::Codec(e))
    }
}
