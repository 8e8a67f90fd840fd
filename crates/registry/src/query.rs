//! Read-only queries over profiles and indexes
//!
//! Bank-scoped queries walk the bank's user list and fetch each profile.
//! Profiles whose stored bank differs from the requested bank are left
//! out everywhere. A listed user whose profile is missing or unreadable
//! shows up as [`ProfileEntry::Missing`] instead of failing the query.

use crate::error::RegistryResult;
use crate::index::{BankIndex, UserIndex};
use crate::ledger::KycLedger;
use crate::records::{DocumentRepo, ProfileRepo};
use kycledger_core::{KycCount, KycProfile, KycRecord};
use kycledger_store::LedgerStore;
use tracing::{debug, warn};

/// One slot of a bank-scoped listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEntry {
    Found(KycProfile),
    /// The user is listed under the bank but no readable profile exists
    Missing { user_id: String },
}

impl ProfileEntry {
    pub fn profile(&self) -> Option<&KycProfile> {
        match self {
            ProfileEntry::Found(profile) => Some(profile),
            ProfileEntry::Missing { .. } => None,
        }
    }

    /// Wire form; missing entries become empty records
    pub fn to_record(&self) -> KycRecord {
        match self {
            ProfileEntry::Found(profile) => KycRecord::from(profile),
            ProfileEntry::Missing { .. } => KycRecord::empty(),
        }
    }
}

impl<S: LedgerStore> KycLedger<S> {
    /// Profiles of `bank_name`, found by scanning every known bank's user
    /// list. Costs O(banks x users) whatever bank is asked for.
    pub fn all_kyc_for_bank(&self, bank_name: &str) -> RegistryResult<Vec<ProfileEntry>> {
        let banks = BankIndex::get(&self.store, &self.config.bank_index_key)?;
        let mut entries = Vec::new();

        for listed_bank in &banks {
            for user_id in self.users_of(listed_bank) {
                match self.entry_for(&user_id, bank_name) {
                    Some(ProfileEntry::Missing { .. }) if listed_bank != bank_name => {}
                    Some(entry) => entries.push(entry),
                    None => {}
                }
            }
        }

        debug!(bank = bank_name, scanned_banks = banks.len(), found = entries.len(), "all KYC for bank");
        Ok(entries)
    }

    /// Direct lookup of one user's profile at one bank
    pub fn kyc_by_user(&self, user_id: &str, bank_name: &str) -> RegistryResult<Option<KycProfile>> {
        let profile = ProfileRepo::get(&self.store, user_id)?;
        Ok(profile.filter(|p| p.belongs_to(bank_name)))
    }

    /// Every user listed under the bank, with their profiles
    pub fn kyc_by_bank(&self, bank_name: &str) -> RegistryResult<Vec<ProfileEntry>> {
        let entries = self
            .users_of(bank_name)
            .iter()
            .filter_map(|user_id| self.entry_for(user_id, bank_name))
            .collect();
        Ok(entries)
    }

    /// Profiles of the bank whose validity ends in the current calendar month
    pub fn kyc_expiring_this_month(&self, bank_name: &str) -> RegistryResult<Vec<KycProfile>> {
        let today = self.today();
        self.profiles_where(bank_name, |p| p.expires_in_month_of(&today))
    }

    /// Profiles of the bank created in the current calendar month
    pub fn kyc_created_this_month(&self, bank_name: &str) -> RegistryResult<Vec<KycProfile>> {
        let today = self.today();
        self.profiles_where(bank_name, |p| p.created_in_month_of(&today))
    }

    /// All, expiring-this-month and created-this-month counts in one pass
    pub fn kyc_counts(&self, bank_name: &str) -> RegistryResult<KycCount> {
        let today = self.today();
        let mut count = KycCount::default();

        for entry in self.kyc_by_bank(bank_name)? {
            count.all += 1;
            if let Some(profile) = entry.profile() {
                if profile.expires_in_month_of(&today) {
                    count.expiring_this_month += 1;
                }
                if profile.created_in_month_of(&today) {
                    count.created_this_month += 1;
                }
            }
        }
        Ok(count)
    }

    /// Stored blob for `(user_id, document_type)`
    pub fn get_document(&self, user_id: &str, document_type: &str) -> RegistryResult<Option<String>> {
        DocumentRepo::get(&self.store, user_id, document_type)
    }

    /// Users listed under a bank; an unreadable list reads as empty
    pub fn users_of(&self, bank_name: &str) -> Vec<String> {
        UserIndex::get(&self.store, bank_name).unwrap_or_else(|e| {
            warn!(bank = bank_name, error = %e, "user list unreadable, skipping");
            Vec::new()
        })
    }

    fn profiles_where(
        &self,
        bank_name: &str,
        keep: impl Fn(&KycProfile) -> bool,
    ) -> RegistryResult<Vec<KycProfile>> {
        let profiles = self
            .kyc_by_bank(bank_name)?
            .into_iter()
            .filter_map(|entry| match entry {
                ProfileEntry::Found(profile) if keep(&profile) => Some(profile),
                _ => None,
            })
            .collect();
        Ok(profiles)
    }

    /// `None` when the user's profile belongs to another bank
    fn entry_for(&self, user_id: &str, bank_name: &str) -> Option<ProfileEntry> {
        match ProfileRepo::get(&self.store, user_id) {
            Ok(Some(profile)) if profile.belongs_to(bank_name) => Some(ProfileEntry::Found(profile)),
            Ok(Some(_)) => None,
            Ok(None) => Some(ProfileEntry::Missing {
                user_id: user_id.to_string(),
            }),
            Err(e) => {
                warn!(user_id, error = %e, "profile unreadable, using placeholder");
                Some(ProfileEntry::Missing {
                    user_id: user_id.to_string(),
                })
            }
        }
    }
}
