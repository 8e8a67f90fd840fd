//! Registry configuration
//!
//! Every field has a default, so a partial JSON file is enough.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`crate::KycLedger`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Run each multi-step write inside one store transaction.
    ///
    /// With `false`, a failed index update leaves the primary write in
    /// place and the error is still returned.
    #[serde(default = "default_atomic_writes")]
    pub atomic_writes: bool,

    /// State key holding the JSON list of bank names
    #[serde(default = "default_bank_index_key")]
    pub bank_index_key: String,

    /// Rebuild missing index entries right after provisioning
    #[serde(default)]
    pub reconcile_on_init: bool,
}

fn default_atomic_writes() -> bool {
    true
}

fn default_bank_index_key() -> String {
    "BankList".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            atomic_writes: default_atomic_writes(),
            bank_index_key: default_bank_index_key(),
            reconcile_on_init: false,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Legacy best-effort writes (no rollback of completed steps)
    pub fn best_effort() -> Self {
        Self {
            atomic_writes: false,
            ..Self::default()
        }
    }
}
