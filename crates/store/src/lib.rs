//! KycLedger Store - Key/value and tabular-row state
//!
//! The registry only talks to state through [`LedgerStore`]: keyed tables
//! with insert / replace / get semantics, a raw key/value space, and a
//! single logical transaction.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 LedgerStore                  │
//! │  ┌──────────────┐         ┌───────────────┐  │
//! │  │ MemoryStore  │         │  SqliteStore  │  │
//! │  │ (in-process) │         │  (durable)    │  │
//! │  └──────────────┘         └───────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod table;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use table::{Column, ColumnDefinition, ColumnType, Row, TableDefinition};
pub use traits::LedgerStore;
