//! In-process store

use crate::error::{StoreError, StoreResult};
use crate::table::{encode_key, Column, ColumnDefinition, Row, TableDefinition};
use crate::traits::LedgerStore;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
struct MemoryTable {
    definition: TableDefinition,
    rows: Vec<Row>,
    positions: HashMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct MemoryState {
    tables: HashMap<String, MemoryTable>,
    values: HashMap<String, Vec<u8>>,
}

/// Store kept entirely in memory.
///
/// Transactions snapshot the whole state on `begin` and restore it on
/// `rollback`, so every transactional write costs a full copy. Fine for
/// tests and small ledgers; use [`crate::SqliteStore`] for anything larger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    state: MemoryState,
    snapshot: Option<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    fn table(&self, name: &str) -> StoreResult<&MemoryTable> {
        self.state
            .tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> StoreResult<&mut MemoryTable> {
        self.state
            .tables
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }
}

impl LedgerStore for MemoryStore {
    fn create_table(&mut self, name: &str, columns: &[ColumnDefinition]) -> StoreResult<()> {
        if self.state.tables.contains_key(name) {
            return Err(StoreError::TableExists(name.to_string()));
        }
        let definition = TableDefinition::new(name, columns)?;
        self.state.tables.insert(
            name.to_string(),
            MemoryTable {
                definition,
                rows: Vec::new(),
                positions: HashMap::new(),
            },
        );
        debug!(table = name, "created table");
        Ok(())
    }

    fn has_table(&self, name: &str) -> StoreResult<bool> {
        Ok(self.state.tables.contains_key(name))
    }

    fn insert_row(&mut self, table: &str, row: Row) -> StoreResult<bool> {
        let mem = self.table_mut(table)?;
        mem.definition.validate_row(&row)?;
        let key = encode_key(&mem.definition.key_of(&row))?;
        if mem.positions.contains_key(&key) {
            return Ok(false);
        }
        mem.positions.insert(key, mem.rows.len());
        mem.rows.push(row);
        Ok(true)
    }

    fn replace_row(&mut self, table: &str, row: Row) -> StoreResult<bool> {
        let mem = self.table_mut(table)?;
        mem.definition.validate_row(&row)?;
        let key = encode_key(&mem.definition.key_of(&row))?;
        match mem.positions.get(&key) {
            Some(&index) => {
                mem.rows[index] = row;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_row(&self, table: &str, key: &[Column]) -> StoreResult<Option<Row>> {
        let mem = self.table(table)?;
        mem.definition.validate_key(key)?;
        let key = encode_key(key)?;
        Ok(mem.positions.get(&key).map(|&index| mem.rows[index].clone()))
    }

    fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        Ok(self.table(table)?.rows.clone())
    }

    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.state.values.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.state.values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.snapshot.is_some() {
            return Err(StoreError::TransactionActive);
        }
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.snapshot
            .take()
            .map(|_| ())
            .ok_or(StoreError::NoTransaction)
    }

    fn rollback(&mut self) -> StoreResult<()> {
        let snapshot = self.snapshot.take().ok_or(StoreError::NoTransaction)?;
        self.state = snapshot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;

    fn store_with_bank_table() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .create_table(
                "BankDetails",
                &[
                    ColumnDefinition::key("BankName", ColumnType::String),
                    ColumnDefinition::value("UserList", ColumnType::Bytes),
                ],
            )
            .unwrap();
        store
    }

    fn bank_row(name: &str, users: &[u8]) -> Row {
        Row::new(vec![Column::string(name), Column::bytes(users.to_vec())])
    }

    #[test]
    fn test_create_table_twice() {
        let mut store = store_with_bank_table();
        let result = store.create_table(
            "BankDetails",
            &[ColumnDefinition::key("BankName", ColumnType::String)],
        );
        assert!(matches!(result, Err(StoreError::TableExists(_))));
        assert!(store.has_table("BankDetails").unwrap());
        assert!(!store.has_table("Other").unwrap());
    }

    #[test]
    fn test_insert_get_replace() {
        let mut store = store_with_bank_table();

        assert!(store.insert_row("BankDetails", bank_row("ABC", b"[]")).unwrap());
        assert!(!store.insert_row("BankDetails", bank_row("ABC", b"[\"U9\"]")).unwrap());

        let row = store
            .get_row("BankDetails", &[Column::string("ABC")])
            .unwrap()
            .unwrap();
        assert_eq!(row.get(1), Some(&Column::bytes(b"[]".to_vec())));

        assert!(store.replace_row("BankDetails", bank_row("ABC", b"[\"U1\"]")).unwrap());
        assert!(!store.replace_row("BankDetails", bank_row("XYZ", b"[]")).unwrap());

        let row = store
            .get_row("BankDetails", &[Column::string("ABC")])
            .unwrap()
            .unwrap();
        assert_eq!(row.get(1), Some(&Column::bytes(b"[\"U1\"]".to_vec())));
        assert!(store
            .get_row("BankDetails", &[Column::string("XYZ")])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unknown_table() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_row("Nope", &[Column::string("x")]),
            Err(StoreError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_rows_keep_insertion_order() {
        let mut store = store_with_bank_table();
        for name in ["ZED", "ABC", "MID"] {
            store.insert_row("BankDetails", bank_row(name, b"[]")).unwrap();
        }
        let names: Vec<String> = store
            .rows("BankDetails")
            .unwrap()
            .iter()
            .filter_map(|r| r.get(0).and_then(Column::as_str).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["ZED", "ABC", "MID"]);
    }

    #[test]
    fn test_rollback_restores_state() {
        let mut store = store_with_bank_table();
        store.put_state("BankList", b"[]").unwrap();

        store.begin().unwrap();
        store.insert_row("BankDetails", bank_row("ABC", b"[]")).unwrap();
        store.put_state("BankList", b"[\"ABC\"]").unwrap();
        store.rollback().unwrap();

        assert!(store
            .get_row("BankDetails", &[Column::string("ABC")])
            .unwrap()
            .is_none());
        assert_eq!(store.get_state("BankList").unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_commit_keeps_writes() {
        let mut store = store_with_bank_table();

        store.begin().unwrap();
        assert!(matches!(store.begin(), Err(StoreError::TransactionActive)));
        store.insert_row("BankDetails", bank_row("ABC", b"[]")).unwrap();
        store.commit().unwrap();

        assert!(!store.in_transaction());
        assert!(matches!(store.commit(), Err(StoreError::NoTransaction)));
        assert!(store
            .get_row("BankDetails", &[Column::string("ABC")])
            .unwrap()
            .is_some());
    }
}
