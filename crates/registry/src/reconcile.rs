//! Index repair
//!
//! Rebuilds missing index entries from the primary records after a
//! partially applied write: every registered bank must be in the bank
//! index, and every profile's user must be listed under its bank. Entries
//! are only ever added; existing order is kept.

use crate::error::RegistryResult;
use crate::index::{BankIndex, UserIndex};
use crate::ledger::KycLedger;
use crate::records::{BankRepo, ProfileRepo};
use kycledger_store::LedgerStore;
use serde::Serialize;
use tracing::info;

/// A user id added to a bank's user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoredUser {
    pub bank_name: String,
    pub user_id: String,
}

/// What a reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub banks_added: Vec<String>,
    pub users_added: Vec<RestoredUser>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.banks_added.is_empty() && self.users_added.is_empty()
    }
}

impl<S: LedgerStore> KycLedger<S> {
    /// Bring the bank index and user lists in line with the stored
    /// bank rows and profiles
    pub fn reconcile(&mut self) -> RegistryResult<ReconcileReport> {
        let report = self.write("reconcile", |store, config| {
            let mut report = ReconcileReport::default();
            let index_key = config.bank_index_key.as_str();

            for bank_name in BankRepo::names(store)? {
                if BankIndex::append(store, index_key, &bank_name)? {
                    report.banks_added.push(bank_name);
                }
            }

            for profile in ProfileRepo::all(store)? {
                let bank_name = profile.bank_name.as_str();
                if BankRepo::get(store, bank_name)?.is_none() {
                    BankRepo::insert(store, bank_name, &UserIndex::encode(&[])?)?;
                    if BankIndex::append(store, index_key, bank_name)? {
                        report.banks_added.push(bank_name.to_string());
                    }
                }

                let mut users = UserIndex::get(store, bank_name).unwrap_or_default();
                if users.iter().any(|u| *u == profile.user_id) {
                    continue;
                }
                users.push(profile.user_id.clone());
                UserIndex::put(store, bank_name, &users)?;
                report.users_added.push(RestoredUser {
                    bank_name: bank_name.to_string(),
                    user_id: profile.user_id.clone(),
                });
            }

            Ok(report)
        })?;

        if !report.is_clean() {
            info!(
                banks_added = report.banks_added.len(),
                users_added = report.users_added.len(),
                "indexes repaired"
            );
        }
        Ok(report)
    }
}
