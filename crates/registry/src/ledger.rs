//! The KYC ledger - wires a store, a clock and configuration together

use crate::config::RegistryConfig;
use crate::error::RegistryResult;
use crate::schema;
use kycledger_core::{Clock, KycDate, SystemClock};
use kycledger_store::{LedgerStore, StoreError};
use std::sync::Arc;
use tracing::{error, info, warn};

/// KYC records over a [`LedgerStore`].
///
/// Writes take `&mut self`: one ledger value is the single writer for
/// its store, which keeps the read-modify-write index updates from
/// racing inside a process.
pub struct KycLedger<S: LedgerStore> {
    pub(crate) store: S,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: RegistryConfig,
}

impl<S: LedgerStore> KycLedger<S> {
    /// Create a ledger using the local wall clock
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub(crate) fn today(&self) -> KycDate {
        KycDate::new(self.clock.today())
    }

    /// Provision the schema (create-if-absent) and, when configured,
    /// repair the indexes afterwards.
    pub fn initialize(&mut self) -> RegistryResult<()> {
        schema::provision(&mut self.store, &self.config.bank_index_key)?;
        if self.config.reconcile_on_init {
            let report = self.reconcile()?;
            info!(
                banks_added = report.banks_added.len(),
                users_added = report.users_added.len(),
                "indexes reconciled on init"
            );
        }
        Ok(())
    }

    /// Run a multi-step write. With `atomic_writes` the steps share one
    /// store transaction and a failure rolls all of them back; otherwise
    /// completed steps stay applied.
    pub(crate) fn write<T>(
        &mut self,
        operation: &str,
        steps: impl FnOnce(&mut S, &RegistryConfig) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        if !self.config.atomic_writes {
            return steps(&mut self.store, &self.config);
        }

        self.store.begin()?;
        match steps(&mut self.store, &self.config) {
            Ok(value) => match self.store.commit() {
                Ok(()) => Ok(value),
                Err(e) => {
                    warn!(operation, error = %e, "commit failed, rolling back");
                    self.abandon(operation);
                    Err(e.into())
                }
            },
            Err(e) => {
                self.abandon(operation);
                Err(e)
            }
        }
    }

    /// Roll back the open transaction; a store that already closed it
    /// reports `NoTransaction`, which is fine here.
    fn abandon(&mut self, operation: &str) {
        match self.store.rollback() {
            Ok(()) | Err(StoreError::NoTransaction) => {}
            Err(rollback_err) => {
                error!(operation, error = %rollback_err, "rollback failed");
            }
        }
    }
}
