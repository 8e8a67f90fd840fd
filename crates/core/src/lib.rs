//! KycLedger Core - Domain types
//!
//! Types shared by every layer: KYC profiles and documents, calendar
//! dates in the ledger's `DD Mon YYYY` text form (`%d %b %Y`), and the
//! clock used to stamp new records.

pub mod clock;
pub mod date;
pub mod document;
pub mod error;
pub mod profile;

pub use clock::{Clock, FixedClock, SystemClock};
pub use date::KycDate;
pub use document::KycDocument;
pub use error::{CoreError, CoreResult};
pub use profile::{KycCount, KycProfile, KycRecord, KycStatus};
