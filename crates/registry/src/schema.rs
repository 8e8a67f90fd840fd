//! Table layout and provisioning

use crate::error::{RegistryError, RegistryResult};
use crate::index::BankIndex;
use kycledger_store::{ColumnDefinition, ColumnType, LedgerStore};
use tracing::info;

pub const PROFILE_TABLE: &str = "KycDetails";
pub const DOCUMENT_TABLE: &str = "KycDocDetails";
pub const BANK_TABLE: &str = "BankDetails";

/// The three record tables with their columns, keys first
pub fn table_definitions() -> Vec<(&'static str, Vec<ColumnDefinition>)> {
    vec![
        (
            PROFILE_TABLE,
            vec![
                ColumnDefinition::key("USER_ID", ColumnType::String),
                ColumnDefinition::value("KYC_BANK_NAME", ColumnType::String),
                ColumnDefinition::value("USER_NAME", ColumnType::String),
                ColumnDefinition::value("KYC_CREATE_DATE", ColumnType::String),
                ColumnDefinition::value("KYC_VALID_TILL_DATE", ColumnType::String),
                ColumnDefinition::value("KYC_STATUS", ColumnType::String),
            ],
        ),
        (
            DOCUMENT_TABLE,
            vec![
                ColumnDefinition::key("USER_ID", ColumnType::String),
                ColumnDefinition::key("DOCUMENT_TYPE", ColumnType::String),
                ColumnDefinition::value("DOCUMENT_BLOB", ColumnType::String),
            ],
        ),
        (
            BANK_TABLE,
            vec![
                ColumnDefinition::key("BankName", ColumnType::String),
                ColumnDefinition::value("UserList", ColumnType::Bytes),
            ],
        ),
    ]
}

/// Create whatever part of the schema is missing.
///
/// Existing tables and an existing bank index are left alone, so running
/// this on an already provisioned store is a no-op. Returns the number of
/// tables created.
pub fn provision<S: LedgerStore>(store: &mut S, bank_index_key: &str) -> RegistryResult<usize> {
    let mut created = 0;
    for (name, columns) in table_definitions() {
        if store.has_table(name)? {
            continue;
        }
        store
            .create_table(name, &columns)
            .map_err(|e| RegistryError::Provisioning(format!("failed creating {name}: {e}")))?;
        created += 1;
    }

    if store.get_state(bank_index_key)?.is_none() {
        BankIndex::put(store, bank_index_key, &[])
            .map_err(|e| RegistryError::Provisioning(format!("failed to put bank list: {e}")))?;
    }

    info!(tables_created = created, "schema provisioned");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kycledger_store::MemoryStore;

    #[test]
    fn test_provision_creates_everything() {
        let mut store = MemoryStore::new();
        assert_eq!(provision(&mut store, "BankList").unwrap(), 3);

        for (name, _) in table_definitions() {
            assert!(store.has_table(name).unwrap());
        }
        assert_eq!(store.get_state("BankList").unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_provision_is_idempotent() {
        let mut store = MemoryStore::new();
        provision(&mut store, "BankList").unwrap();
        store.put_state("BankList", b"[\"ABC\"]").unwrap();

        assert_eq!(provision(&mut store, "BankList").unwrap(), 0);
        assert_eq!(
            store.get_state("BankList").unwrap(),
            Some(b"[\"ABC\"]".to_vec())
        );
    }

    #[test]
    fn test_provision_fills_partial_schema() {
        let mut store = MemoryStore::new();
        let (name, columns) = &table_definitions()[0];
        store.create_table(name, columns).unwrap();

        assert_eq!(provision(&mut store, "BankList").unwrap(), 2);
    }
}
