//! SQLite-backed store
//!
//! Generic layout: table definitions, rows (JSON-encoded columns keyed by
//! the table's key columns) and raw state values each live in one SQLite
//! table.

use crate::error::{StoreError, StoreResult};
use crate::table::{encode_key, Column, ColumnDefinition, Row, TableDefinition};
use crate::traits::LedgerStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, warn};

/// Durable store on a SQLite database
pub struct SqliteStore {
    conn: Connection,
    in_transaction: bool,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            in_transaction: false,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn,
            in_transaction: false,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS ledger_tables (
                name TEXT PRIMARY KEY,
                definition_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS ledger_rows (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                table_name TEXT NOT NULL,
                row_key TEXT NOT NULL,
                row_json TEXT NOT NULL,
                UNIQUE (table_name, row_key)
            );
            CREATE TABLE IF NOT EXISTS ledger_state (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );",
        )?;
        Ok(())
    }

    fn definition(&self, table: &str) -> StoreResult<TableDefinition> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT definition_json FROM ledger_tables WHERE name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()?;
        let json = json.ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn encoded(&self, table: &str, row: &Row) -> StoreResult<(String, String)> {
        let definition = self.definition(table)?;
        definition.validate_row(row)?;
        let key = encode_key(&definition.key_of(row))?;
        let json = serde_json::to_string(&row.columns)?;
        Ok((key, json))
    }

    fn decode_row(json: &str) -> StoreResult<Row> {
        let columns: Vec<Column> = serde_json::from_str(json)?;
        Ok(Row::new(columns))
    }
}

impl LedgerStore for SqliteStore {
    fn create_table(&mut self, name: &str, columns: &[ColumnDefinition]) -> StoreResult<()> {
        if self.has_table(name)? {
            return Err(StoreError::TableExists(name.to_string()));
        }
        let definition = TableDefinition::new(name, columns)?;
        self.conn.execute(
            "INSERT INTO ledger_tables (name, definition_json) VALUES (?1, ?2)",
            params![name, serde_json::to_string(&definition)?],
        )?;
        debug!(table = name, "created table");
        Ok(())
    }

    fn has_table(&self, name: &str) -> StoreResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM ledger_tables WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn insert_row(&mut self, table: &str, row: Row) -> StoreResult<bool> {
        let (key, json) = self.encoded(table, &row)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO ledger_rows (table_name, row_key, row_json)
             VALUES (?1, ?2, ?3)",
            params![table, key, json],
        )?;
        Ok(inserted > 0)
    }

    fn replace_row(&mut self, table: &str, row: Row) -> StoreResult<bool> {
        let (key, json) = self.encoded(table, &row)?;
        let updated = self.conn.execute(
            "UPDATE ledger_rows SET row_json = ?3 WHERE table_name = ?1 AND row_key = ?2",
            params![table, key, json],
        )?;
        Ok(updated > 0)
    }

    fn get_row(&self, table: &str, key: &[Column]) -> StoreResult<Option<Row>> {
        let definition = self.definition(table)?;
        definition.validate_key(key)?;
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT row_json FROM ledger_rows WHERE table_name = ?1 AND row_key = ?2",
                params![table, encode_key(key)?],
                |row| row.get(0),
            )
            .optional()?;
        json.as_deref().map(Self::decode_row).transpose()
    }

    fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.definition(table)?;
        let mut stmt = self
            .conn
            .prepare("SELECT row_json FROM ledger_rows WHERE table_name = ?1 ORDER BY seq")?;
        let encoded: Vec<String> = stmt
            .query_map(params![table], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        encoded.iter().map(|json| Self::decode_row(json)).collect()
    }

    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM ledger_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO ledger_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.in_transaction {
            return Err(StoreError::TransactionActive);
        }
        self.conn.execute_batch("BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        if !self.in_transaction {
            return Err(StoreError::NoTransaction);
        }
        // A failed COMMIT (e.g. SQLITE_BUSY) leaves the transaction open
        if let Err(e) = self.conn.execute_batch("COMMIT") {
            if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                warn!(error = %rollback_err, "rollback after failed commit failed");
            }
            self.in_transaction = false;
            return Err(e.into());
        }
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        if !self.in_transaction {
            return Err(StoreError::NoTransaction);
        }
        self.conn.execute_batch("ROLLBACK")?;
        self.in_transaction = false;
        Ok(())
    }
}
