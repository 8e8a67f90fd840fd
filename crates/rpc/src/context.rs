//! Application context - opens the store and wires the ledger

use crate::dispatch;
use anyhow::Context;
use kycledger_registry::{KycLedger, ReconcileReport, RegistryConfig};
use kycledger_store::SqliteStore;
use std::path::Path;
use tracing::info;

/// Path value that selects a throwaway in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// A ledger over a SQLite database plus its configuration
pub struct AppContext {
    pub ledger: KycLedger<SqliteStore>,
}

impl AppContext {
    /// Open (creating if needed) the database at `db_path` and provision
    /// the schema. Without a config file every setting takes its default.
    pub fn open(db_path: &Path, config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => RegistryConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => RegistryConfig::default(),
        };

        let store = if db_path == Path::new(IN_MEMORY) {
            SqliteStore::in_memory()?
        } else {
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            SqliteStore::open(db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?
        };

        info!(
            db = %db_path.display(),
            atomic_writes = config.atomic_writes,
            "ledger opened"
        );
        let mut ctx = Self::with_ledger(KycLedger::new(store, config));
        ctx.init()?;
        Ok(ctx)
    }

    pub fn with_ledger(ledger: KycLedger<SqliteStore>) -> Self {
        Self { ledger }
    }

    /// Provision tables and the bank index; safe to repeat
    fn init(&mut self) -> anyhow::Result<()> {
        self.ledger.initialize()?;
        Ok(())
    }

    pub fn invoke(&mut self, operation: &str, args: &[String]) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(dispatch::invoke(&mut self.ledger, operation, args)?)
    }

    pub fn reconcile(&mut self) -> anyhow::Result<ReconcileReport> {
        Ok(self.ledger.reconcile()?)
    }
}
