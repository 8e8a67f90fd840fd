//! Write paths: profiles, documents, banks, renewals

use crate::error::RegistryResult;
use crate::index::{BankIndex, UserIndex};
use crate::ledger::KycLedger;
use crate::records::{BankRepo, DocumentRepo, ProfileRepo};
use crate::schema::PROFILE_TABLE;
use kycledger_core::{KycDocument, KycProfile};
use kycledger_store::{LedgerStore, StoreError};
use tracing::{info, warn};

impl<S: LedgerStore> KycLedger<S> {
    /// Open a profile dated today and add the user to the bank's user list.
    ///
    /// Fails if the user already has a profile. An unreadable user list is
    /// treated as empty. If the list cannot be written back the error is
    /// returned; whether the profile insert survives depends on
    /// `atomic_writes`.
    pub fn create_kyc_profile(
        &mut self,
        user_id: &str,
        bank_name: &str,
        user_name: &str,
    ) -> RegistryResult<KycProfile> {
        let profile = KycProfile::open(user_id, bank_name, user_name, self.today());

        self.write("createKycProfile", |store, _| {
            ProfileRepo::insert(store, &profile)?;

            let mut users = UserIndex::get(store, bank_name).unwrap_or_else(|e| {
                warn!(bank = bank_name, error = %e, "user list unreadable, starting empty");
                Vec::new()
            });
            if !users.iter().any(|u| u == user_id) {
                users.push(user_id.to_string());
            }
            UserIndex::put(store, bank_name, &users).inspect_err(|e| {
                warn!(user_id, bank = bank_name, error = %e, "user list update failed");
            })
        })?;

        info!(
            user_id,
            bank = bank_name,
            valid_till = %profile.valid_till_date,
            "KYC profile created"
        );
        Ok(profile)
    }

    /// Attach a document; each `(user_id, document_type)` pair is written once
    pub fn attach_document(
        &mut self,
        user_id: &str,
        document_type: &str,
        document_blob: &str,
    ) -> RegistryResult<()> {
        let document = KycDocument::new(user_id, document_type, document_blob);
        DocumentRepo::insert(&mut self.store, &document)?;
        info!(user_id, document_type, "KYC document attached");
        Ok(())
    }

    /// Register a bank with an empty user list and add it to the bank index
    pub fn register_bank(&mut self, bank_name: &str) -> RegistryResult<()> {
        self.write("registerBank", |store, config| {
            BankRepo::insert(store, bank_name, &UserIndex::encode(&[])?)?;
            BankIndex::append(store, &config.bank_index_key, bank_name)?;
            Ok(())
        })?;
        info!(bank = bank_name, "bank registered");
        Ok(())
    }

    /// Rename the holder and restart the validity window from today.
    ///
    /// `created_date` and `status` are preserved. Renewing a user without
    /// a profile fails with `MissingKey`.
    pub fn renew_kyc_profile(&mut self, user_id: &str, user_name: &str) -> RegistryResult<KycProfile> {
        let today = self.today();
        let mut profile = ProfileRepo::get(&self.store, user_id)?
            .ok_or_else(|| StoreError::missing_key(PROFILE_TABLE, user_id))?;

        profile.renew(user_name, today);
        ProfileRepo::replace(&mut self.store, &profile)?;

        info!(user_id, valid_till = %profile.valid_till_date, "KYC profile renewed");
        Ok(profile)
    }
}
