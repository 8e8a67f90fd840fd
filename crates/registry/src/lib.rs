//! KycLedger Registry
//!
//! KYC records shared by many banks on one ledger store: profiles,
//! documents, the bank registry and the two derived indexes (the global
//! bank list and per-bank user lists).
//!
//! ## Layers
//!
//! ```text
//!   Lifecycle writes ──┐     ┌── Queries
//!                      ▼     ▼
//!             ┌────────────────────────┐
//!             │ records    │   index   │
//!             └────────────────────────┘
//!                         │
//!                    LedgerStore
//! ```
//!
//! - [`schema`] - table layout, idempotent provisioning
//! - [`records`] - keyed row access to the three tables
//! - [`index`] - bank list and per-bank user lists (JSON-encoded)
//! - [`KycLedger`] - lifecycle writes, queries and index repair

pub mod config;
pub mod error;
pub mod index;
pub mod ledger;
mod lifecycle;
pub mod query;
pub mod reconcile;
pub mod records;
pub mod schema;

pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use ledger::KycLedger;
pub use query::ProfileEntry;
pub use reconcile::{ReconcileReport, RestoredUser};
