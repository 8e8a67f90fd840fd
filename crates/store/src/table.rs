//! Table definitions, columns and rows

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Column value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Bytes,
}

/// One column of a table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub key: bool,
}

impl ColumnDefinition {
    pub fn key(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            key: true,
        }
    }

    pub fn value(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            key: false,
        }
    }
}

/// A column value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    String(String),
    Bytes(Vec<u8>),
}

impl Column {
    pub fn string(value: impl Into<String>) -> Self {
        Column::String(value.into())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Column::Bytes(value.into())
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::String(_) => ColumnType::String,
            Column::Bytes(_) => ColumnType::Bytes,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Column::String(s) => Some(s),
            Column::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Column::Bytes(b) => Some(b),
            Column::String(_) => None,
        }
    }
}

/// An ordered list of column values, laid out as the table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<Column>,
}

impl Row {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }
}

/// A named table with its column layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: &str, columns: &[ColumnDefinition]) -> StoreResult<Self> {
        if columns.is_empty() {
            return Err(StoreError::column_mismatch(name, "table has no columns"));
        }
        if !columns.iter().any(|c| c.key) {
            return Err(StoreError::column_mismatch(name, "table has no key column"));
        }
        Ok(Self {
            name: name.to_string(),
            columns: columns.to_vec(),
        })
    }

    pub fn key_arity(&self) -> usize {
        self.columns.iter().filter(|c| c.key).count()
    }

    /// Check a full row against the layout
    pub fn validate_row(&self, row: &Row) -> StoreResult<()> {
        if row.columns.len() != self.columns.len() {
            return Err(StoreError::column_mismatch(
                &self.name,
                format!(
                    "expected {} columns, got {}",
                    self.columns.len(),
                    row.columns.len()
                ),
            ));
        }
        for (def, value) in self.columns.iter().zip(&row.columns) {
            if def.column_type != value.column_type() {
                return Err(StoreError::column_mismatch(
                    &self.name,
                    format!("column {} expects {:?}", def.name, def.column_type),
                ));
            }
        }
        Ok(())
    }

    /// Key columns of a row, in definition order
    pub fn key_of(&self, row: &Row) -> Vec<Column> {
        self.columns
            .iter()
            .zip(&row.columns)
            .filter(|(def, _)| def.key)
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Check a lookup key against the key columns
    pub fn validate_key(&self, key: &[Column]) -> StoreResult<()> {
        let key_defs: Vec<&ColumnDefinition> = self.columns.iter().filter(|c| c.key).collect();
        if key.len() != key_defs.len() {
            return Err(StoreError::KeyArity {
                table: self.name.clone(),
                expected: key_defs.len(),
                actual: key.len(),
            });
        }
        for (def, value) in key_defs.iter().zip(key) {
            if def.column_type != value.column_type() {
                return Err(StoreError::column_mismatch(
                    &self.name,
                    format!("key column {} expects {:?}", def.name, def.column_type),
                ));
            }
        }
        Ok(())
    }
}

/// Canonical text form of a key, used for storage and error messages
pub fn encode_key(key: &[Column]) -> StoreResult<String> {
    Ok(serde_json::to_string(key)?)
}
