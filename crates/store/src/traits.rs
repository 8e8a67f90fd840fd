//! The state interface consumed by the registry

use crate::error::StoreResult;
use crate::table::{Column, ColumnDefinition, Row};

/// Key/value and tabular-row state.
///
/// Every call is synchronous and either completes or fails; nothing is
/// left pending. Absence is reported as `None` / `false`, never as a
/// zero-valued row.
pub trait LedgerStore {
    /// Create a table. Fails with `TableExists` if the name is taken.
    fn create_table(&mut self, name: &str, columns: &[ColumnDefinition]) -> StoreResult<()>;

    fn has_table(&self, name: &str) -> StoreResult<bool>;

    /// Insert a new row. Returns `false` without writing when the key exists.
    fn insert_row(&mut self, table: &str, row: Row) -> StoreResult<bool>;

    /// Replace an existing row. Returns `false` without writing when the key is absent.
    fn replace_row(&mut self, table: &str, row: Row) -> StoreResult<bool>;

    /// Fetch the row with the given key columns
    fn get_row(&self, table: &str, key: &[Column]) -> StoreResult<Option<Row>>;

    /// All rows of a table in insertion order
    fn rows(&self, table: &str) -> StoreResult<Vec<Row>>;

    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    fn put_state(&mut self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Open the single logical transaction. Nested calls fail with `TransactionActive`.
    fn begin(&mut self) -> StoreResult<()>;

    fn commit(&mut self) -> StoreResult<()>;

    /// Discard every write since `begin`
    fn rollback(&mut self) -> StoreResult<()>;
}
