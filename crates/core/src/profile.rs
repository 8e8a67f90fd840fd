//! KYC profiles
//!
//! [`KycProfile`] is the typed record kept by the registry. [`KycRecord`]
//! is its wire form: plain strings under the ledger's JSON field names,
//! where an all-empty record stands for "no profile here".

use crate::date::KycDate;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Lifecycle tag of a profile.
///
/// Profiles are stamped `Created` and no transition out of it exists;
/// renewal leaves the tag untouched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
pub enum KycStatus {
    #[default]
    Created,
}

impl KycStatus {
    /// Parse a stored status tag
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::from_str(s).map_err(|_| CoreError::InvalidStatus(s.to_string()))
    }
}

/// One KYC profile, keyed by `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycProfile {
    pub user_id: String,
    pub bank_name: String,
    pub user_name: String,
    pub created_date: KycDate,
    pub valid_till_date: KycDate,
    pub status: KycStatus,
}

impl KycProfile {
    /// New profile opened on `today`, valid for one year minus one day
    pub fn open(
        user_id: impl Into<String>,
        bank_name: impl Into<String>,
        user_name: impl Into<String>,
        today: KycDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            bank_name: bank_name.into(),
            user_name: user_name.into(),
            created_date: today,
            valid_till_date: today.validity_end(),
            status: KycStatus::Created,
        }
    }

    /// Rename the holder and restart the validity window from `today`.
    ///
    /// `created_date` and `status` are kept.
    pub fn renew(&mut self, user_name: impl Into<String>, today: KycDate) {
        self.user_name = user_name.into();
        self.valid_till_date = today.validity_end();
    }

    pub fn expires_in_month_of(&self, today: &KycDate) -> bool {
        self.valid_till_date.same_month_as(today)
    }

    pub fn created_in_month_of(&self, today: &KycDate) -> bool {
        self.created_date.same_month_as(today)
    }

    pub fn belongs_to(&self, bank_name: &str) -> bool {
        self.bank_name == bank_name
    }
}

/// Wire form of a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycRecord {
    #[serde(rename = "USER_NAME")]
    pub user_name: String,
    #[serde(rename = "USER_ID")]
    pub user_id: String,
    #[serde(rename = "KYC_BANK_NAME")]
    pub bank_name: String,
    #[serde(rename = "KYC_CREATE_DATE")]
    pub created_date: String,
    #[serde(rename = "KYC_VALID_TILL_DATE")]
    pub valid_till_date: String,
    #[serde(rename = "KYC_STATUS")]
    pub status: String,
}

impl KycRecord {
    /// Placeholder emitted where a profile could not be read
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&KycProfile> for KycRecord {
    fn from(profile: &KycProfile) -> Self {
        Self {
            user_name: profile.user_name.clone(),
            user_id: profile.user_id.clone(),
            bank_name: profile.bank_name.clone(),
            created_date: profile.created_date.to_string(),
            valid_till_date: profile.valid_till_date.to_string(),
            status: profile.status.to_string(),
        }
    }
}

impl TryFrom<&KycRecord> for KycProfile {
    type Error = CoreError;

    fn try_from(record: &KycRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: record.user_id.clone(),
            bank_name: record.bank_name.clone(),
            user_name: record.user_name.clone(),
            created_date: record.created_date.parse()?,
            valid_till_date: record.valid_till_date.parse()?,
            status: KycStatus::parse(&record.status)?,
        })
    }
}

/// Aggregate counts for one bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycCount {
    #[serde(rename = "AllContracts")]
    pub all: usize,
    #[serde(rename = "ExpiringContracts")]
    pub expiring_this_month: usize,
    #[serde(rename = "CreatedContracts")]
    pub created_this_month: usize,
}
