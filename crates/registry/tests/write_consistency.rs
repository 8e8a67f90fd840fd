//! Multi-step writes against a store that rejects index updates

use std::sync::Arc;

use kycledger_core::FixedClock;
use kycledger_registry::index::{BankIndex, UserIndex};
use kycledger_registry::records::ProfileRepo;
use kycledger_registry::schema::BANK_TABLE;
use kycledger_registry::{KycLedger, RegistryConfig};
use kycledger_store::{
    Column, ColumnDefinition, LedgerStore, MemoryStore, Row, StoreError, StoreResult,
};

/// Delegates to a MemoryStore, optionally refusing bank-row replaces,
/// bank-index writes and the next few commits
struct FlakyStore {
    inner: MemoryStore,
    reject_bank_updates: bool,
    reject_index_writes: bool,
    busy_commits: usize,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            reject_bank_updates: false,
            reject_index_writes: false,
            busy_commits: 0,
        }
    }
}

impl LedgerStore for FlakyStore {
    fn create_table(&mut self, name: &str, columns: &[ColumnDefinition]) -> StoreResult<()> {
        self.inner.create_table(name, columns)
    }

    fn has_table(&self, name: &str) -> StoreResult<bool> {
        self.inner.has_table(name)
    }

    fn insert_row(&mut self, table: &str, row: Row) -> StoreResult<bool> {
        self.inner.insert_row(table, row)
    }

    fn replace_row(&mut self, table: &str, row: Row) -> StoreResult<bool> {
        if self.reject_bank_updates && table == BANK_TABLE {
            return Ok(false);
        }
        self.inner.replace_row(table, row)
    }

    fn get_row(&self, table: &str, key: &[Column]) -> StoreResult<Option<Row>> {
        self.inner.get_row(table, key)
    }

    fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.inner.rows(table)
    }

    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> StoreResult<()> {
        if self.reject_index_writes {
            return Err(StoreError::column_mismatch(key, "state writes disabled"));
        }
        self.inner.put_state(key, value)
    }

    fn begin(&mut self) -> StoreResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> StoreResult<()> {
        if self.busy_commits > 0 {
            // Like SQLITE_BUSY: the commit fails and the transaction stays open
            self.busy_commits -= 1;
            let busy = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY);
            return Err(rusqlite::Error::SqliteFailure(busy, None).into());
        }
        self.inner.commit()
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.inner.rollback()
    }
}

fn ledger(config: RegistryConfig) -> KycLedger<FlakyStore> {
    let mut ledger = KycLedger::new(FlakyStore::new(), config)
        .with_clock(Arc::new(FixedClock::ymd(2024, 3, 15).unwrap()));
    ledger.initialize().unwrap();
    ledger.register_bank("ABC").unwrap();
    ledger
}

fn reject_bank_updates(ledger: KycLedger<FlakyStore>, config: RegistryConfig) -> KycLedger<FlakyStore> {
    let mut store = ledger.into_store();
    store.reject_bank_updates = true;
    KycLedger::new(store, config).with_clock(Arc::new(FixedClock::ymd(2024, 3, 15).unwrap()))
}

#[test]
fn test_atomic_create_rolls_back_profile() {
    let config = RegistryConfig::default();
    let mut ledger = reject_bank_updates(ledger(config.clone()), config);

    assert!(ledger.create_kyc_profile("U1", "ABC", "Alice").is_err());
    assert!(ProfileRepo::get(ledger.store(), "U1").unwrap().is_none());
    assert!(UserIndex::get(ledger.store(), "ABC").unwrap().is_empty());
}

#[test]
fn test_best_effort_create_leaves_profile_and_stale_index() {
    let config = RegistryConfig::best_effort();
    let mut ledger = reject_bank_updates(ledger(config.clone()), config.clone());

    assert!(ledger.create_kyc_profile("U1", "ABC", "Alice").is_err());
    assert!(ProfileRepo::get(ledger.store(), "U1").unwrap().is_some());
    assert!(UserIndex::get(ledger.store(), "ABC").unwrap().is_empty());

    // Once the store accepts writes again, repair restores the listing
    let mut store = ledger.into_store();
    store.reject_bank_updates = false;
    let mut ledger = KycLedger::new(store, config);
    let report = ledger.reconcile().unwrap();
    assert_eq!(report.users_added.len(), 1);
    assert_eq!(UserIndex::get(ledger.store(), "ABC").unwrap(), vec!["U1"]);
}

#[test]
fn test_atomic_register_bank_rolls_back_row() {
    let config = RegistryConfig::default();
    let mut store = ledger(config.clone()).into_store();
    store.reject_index_writes = true;
    let mut ledger = KycLedger::new(store, config);

    assert!(ledger.register_bank("XYZ").is_err());
    assert!(ledger.store().get_row(BANK_TABLE, &[Column::string("XYZ")]).unwrap().is_none());
    assert_eq!(
        BankIndex::get(ledger.store(), "BankList").unwrap(),
        vec!["ABC"]
    );
}

#[test]
fn test_best_effort_register_bank_keeps_row() {
    let config = RegistryConfig::best_effort();
    let mut store = ledger(config.clone()).into_store();
    store.reject_index_writes = true;
    let mut ledger = KycLedger::new(store, config);

    assert!(ledger.register_bank("XYZ").is_err());
    assert!(ledger.store().get_row(BANK_TABLE, &[Column::string("XYZ")]).unwrap().is_some());
    assert_eq!(
        BankIndex::get(ledger.store(), "BankList").unwrap(),
        vec!["ABC"]
    );
}

#[test]
fn test_failed_commit_is_rolled_back() {
    let config = RegistryConfig::default();
    let mut store = ledger(config.clone()).into_store();
    store.busy_commits = 1;
    let mut ledger = KycLedger::new(store, config)
        .with_clock(Arc::new(FixedClock::ymd(2024, 3, 15).unwrap()));

    assert!(ledger.create_kyc_profile("U1", "ABC", "Alice").is_err());
    assert!(!ledger.store().inner.in_transaction());
    assert!(ProfileRepo::get(ledger.store(), "U1").unwrap().is_none());

    // The ledger is usable again once commits go through
    ledger.create_kyc_profile("U1", "ABC", "Alice").unwrap();
    assert_eq!(UserIndex::get(ledger.store(), "ABC").unwrap(), vec!["U1"]);
}
