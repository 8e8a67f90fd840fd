//! Keyed row access to the profile, document and bank tables
//!
//! Inserts that hit an existing key and replaces that miss one surface as
//! `StoreError::DuplicateKey` / `StoreError::MissingKey`.

use crate::error::{RegistryError, RegistryResult};
use crate::schema::{BANK_TABLE, DOCUMENT_TABLE, PROFILE_TABLE};
use kycledger_core::{KycDocument, KycProfile, KycStatus};
use kycledger_store::{Column, LedgerStore, Row, StoreError};
use tracing::debug;

// ============================================================================
// Profiles
// ============================================================================

/// Repository for the profile table
pub struct ProfileRepo;

impl ProfileRepo {
    pub fn insert<S: LedgerStore>(store: &mut S, profile: &KycProfile) -> RegistryResult<()> {
        if !store.insert_row(PROFILE_TABLE, Self::to_row(profile))? {
            return Err(StoreError::duplicate_key(PROFILE_TABLE, &profile.user_id).into());
        }
        Ok(())
    }

    pub fn replace<S: LedgerStore>(store: &mut S, profile: &KycProfile) -> RegistryResult<()> {
        if !store.replace_row(PROFILE_TABLE, Self::to_row(profile))? {
            return Err(StoreError::missing_key(PROFILE_TABLE, &profile.user_id).into());
        }
        Ok(())
    }

    /// Profile for a user; `None` when no row exists
    pub fn get<S: LedgerStore>(store: &S, user_id: &str) -> RegistryResult<Option<KycProfile>> {
        debug!(user_id, "reading profile");
        store
            .get_row(PROFILE_TABLE, &[Column::string(user_id)])?
            .map(|row| Self::from_row(&row))
            .transpose()
    }

    /// Every profile, in insertion order
    pub fn all<S: LedgerStore>(store: &S) -> RegistryResult<Vec<KycProfile>> {
        store
            .rows(PROFILE_TABLE)?
            .iter()
            .map(Self::from_row)
            .collect()
    }

    fn to_row(profile: &KycProfile) -> Row {
        Row::new(vec![
            Column::string(profile.user_id.as_str()),
            Column::string(profile.bank_name.as_str()),
            Column::string(profile.user_name.as_str()),
            Column::string(profile.created_date.to_string()),
            Column::string(profile.valid_till_date.to_string()),
            Column::string(profile.status.to_string()),
        ])
    }

    fn from_row(row: &Row) -> RegistryResult<KycProfile> {
        Ok(KycProfile {
            user_id: text_column(row, 0)?.to_string(),
            bank_name: text_column(row, 1)?.to_string(),
            user_name: text_column(row, 2)?.to_string(),
            created_date: text_column(row, 3)?.parse()?,
            valid_till_date: text_column(row, 4)?.parse()?,
            status: KycStatus::parse(text_column(row, 5)?)?,
        })
    }
}

fn text_column(row: &Row, index: usize) -> RegistryResult<&str> {
    row.get(index).and_then(Column::as_str).ok_or_else(|| {
        RegistryError::malformed(PROFILE_TABLE, format!("column {index} is not text"))
    })
}

// ============================================================================
// Documents
// ============================================================================

/// Repository for the document table
pub struct DocumentRepo;

impl DocumentRepo {
    pub fn insert<S: LedgerStore>(store: &mut S, document: &KycDocument) -> RegistryResult<()> {
        let row = Row::new(vec![
            Column::string(document.user_id.as_str()),
            Column::string(document.document_type.as_str()),
            Column::string(document.document_blob.as_str()),
        ]);
        if !store.insert_row(DOCUMENT_TABLE, row)? {
            let key = format!("{}/{}", document.user_id, document.document_type);
            return Err(StoreError::duplicate_key(DOCUMENT_TABLE, &key).into());
        }
        Ok(())
    }

    /// Blob stored for `(user_id, document_type)`
    pub fn get<S: LedgerStore>(
        store: &S,
        user_id: &str,
        document_type: &str,
    ) -> RegistryResult<Option<String>> {
        let key = [Column::string(user_id), Column::string(document_type)];
        let Some(row) = store.get_row(DOCUMENT_TABLE, &key)? else {
            return Ok(None);
        };
        row.get(2)
            .and_then(Column::as_str)
            .map(|blob| Some(blob.to_string()))
            .ok_or_else(|| RegistryError::malformed(DOCUMENT_TABLE, "blob is not text"))
    }
}

// ============================================================================
// Bank registry
// ============================================================================

/// Repository for the bank table. User lists are opaque bytes here;
/// [`crate::index::UserIndex`] owns their encoding.
pub struct BankRepo;

impl BankRepo {
    pub fn insert<S: LedgerStore>(store: &mut S, bank_name: &str, users: &[u8]) -> RegistryResult<()> {
        if !store.insert_row(BANK_TABLE, Self::to_row(bank_name, users))? {
            return Err(StoreError::duplicate_key(BANK_TABLE, bank_name).into());
        }
        Ok(())
    }

    pub fn replace<S: LedgerStore>(store: &mut S, bank_name: &str, users: &[u8]) -> RegistryResult<()> {
        if !store.replace_row(BANK_TABLE, Self::to_row(bank_name, users))? {
            return Err(StoreError::missing_key(BANK_TABLE, bank_name).into());
        }
        Ok(())
    }

    pub fn get<S: LedgerStore>(store: &S, bank_name: &str) -> RegistryResult<Option<Vec<u8>>> {
        let Some(row) = store.get_row(BANK_TABLE, &[Column::string(bank_name)])? else {
            return Ok(None);
        };
        row.get(1)
            .and_then(Column::as_bytes)
            .map(|users| Some(users.to_vec()))
            .ok_or_else(|| RegistryError::malformed(BANK_TABLE, "user list is not bytes"))
    }

    /// Names of every registered bank, in registration order
    pub fn names<S: LedgerStore>(store: &S) -> RegistryResult<Vec<String>> {
        store
            .rows(BANK_TABLE)?
            .iter()
            .map(|row| {
                row.get(0)
                    .and_then(Column::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| RegistryError::malformed(BANK_TABLE, "bank name is not text"))
            })
            .collect()
    }

    fn to_row(bank_name: &str, users: &[u8]) -> Row {
        Row::new(vec![Column::string(bank_name), Column::bytes(users)])
    }
}
