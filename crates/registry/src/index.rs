//! Derived indexes: the global bank list and per-bank user lists
//!
//! Both are JSON-encoded string lists. Updates are read-modify-write and
//! only safe under a single writer; [`crate::KycLedger`] takes `&mut self`
//! for every write to keep it that way.

use crate::error::RegistryResult;
use crate::records::BankRepo;
use kycledger_store::LedgerStore;
use tracing::{debug, warn};

/// Global list of known bank names, kept under one state key
pub struct BankIndex;

impl BankIndex {
    /// Decoded bank list. An absent key or an undecodable value reads as
    /// an empty list; only store failures are returned.
    pub fn get<S: LedgerStore>(store: &S, key: &str) -> RegistryResult<Vec<String>> {
        let Some(bytes) = store.get_state(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice::<Option<Vec<String>>>(&bytes) {
            Ok(banks) => Ok(banks.unwrap_or_default()),
            Err(e) => {
                warn!(key, error = %e, "bank index undecodable, reading as empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn put<S: LedgerStore>(store: &mut S, key: &str, banks: &[String]) -> RegistryResult<()> {
        let bytes = serde_json::to_vec(banks)?;
        store.put_state(key, &bytes)?;
        Ok(())
    }

    /// Append a bank name unless it is already listed.
    /// Returns whether the list changed.
    pub fn append<S: LedgerStore>(store: &mut S, key: &str, bank_name: &str) -> RegistryResult<bool> {
        let mut banks = Self::get(store, key)?;
        if banks.iter().any(|b| b == bank_name) {
            return Ok(false);
        }
        banks.push(bank_name.to_string());
        Self::put(store, key, &banks)?;
        debug!(bank = bank_name, total = banks.len(), "bank index updated");
        Ok(true)
    }
}

/// Per-bank ordered list of onboarded user ids, stored in the bank row
pub struct UserIndex;

impl UserIndex {
    /// Users of a bank in onboarding order; empty when the bank has no row
    pub fn get<S: LedgerStore>(store: &S, bank_name: &str) -> RegistryResult<Vec<String>> {
        let Some(bytes) = BankRepo::get(store, bank_name)? else {
            return Ok(Vec::new());
        };
        let users: Option<Vec<String>> = serde_json::from_slice(&bytes)?;
        Ok(users.unwrap_or_default())
    }

    /// Overwrite the user list of an existing bank row
    pub fn put<S: LedgerStore>(store: &mut S, bank_name: &str, users: &[String]) -> RegistryResult<()> {
        let bytes = serde_json::to_vec(users)?;
        BankRepo::replace(store, bank_name, &bytes)
    }

    pub fn encode(users: &[String]) -> RegistryResult<Vec<u8>> {
        Ok(serde_json::to_vec(users)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::provision;
    use kycledger_store::MemoryStore;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        provision(&mut store, "BankList").unwrap();
        store
    }

    #[test]
    fn test_bank_index_append() {
        let mut store = store();
        assert!(BankIndex::get(&store, "BankList").unwrap().is_empty());

        assert!(BankIndex::append(&mut store, "BankList", "ABC").unwrap());
        assert!(BankIndex::append(&mut store, "BankList", "XYZ").unwrap());
        assert!(!BankIndex::append(&mut store, "BankList", "ABC").unwrap());

        assert_eq!(BankIndex::get(&store, "BankList").unwrap(), vec!["ABC", "XYZ"]);
    }

    #[test]
    fn test_bank_index_absent_or_garbage() {
        let mut store = MemoryStore::new();
        assert!(BankIndex::get(&store, "BankList").unwrap().is_empty());

        store.put_state("BankList", b"{not json").unwrap();
        assert!(BankIndex::get(&store, "BankList").unwrap().is_empty());

        store.put_state("BankList", b"null").unwrap();
        assert!(BankIndex::get(&store, "BankList").unwrap().is_empty());
    }

    #[test]
    fn test_user_index() {
        let mut store = store();
        BankRepo::insert(&mut store, "ABC", &UserIndex::encode(&[]).unwrap()).unwrap();
        assert!(UserIndex::get(&store, "ABC").unwrap().is_empty());

        let users = vec!["U1".to_string(), "U2".to_string()];
        UserIndex::put(&mut store, "ABC", &users).unwrap();
        assert_eq!(UserIndex::get(&store, "ABC").unwrap(), users);

        assert!(UserIndex::get(&store, "NOPE").unwrap().is_empty());
        assert!(UserIndex::put(&mut store, "NOPE", &users).is_err());
    }

    #[test]
    fn test_user_index_null_list() {
        let mut store = store();
        BankRepo::insert(&mut store, "ABC", b"null").unwrap();
        assert!(UserIndex::get(&store, "ABC").unwrap().is_empty());
    }
}
