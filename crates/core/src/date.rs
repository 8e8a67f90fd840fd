//! Calendar dates for KYC validity windows
//!
//! Dates carry no time component and are stored as text in the
//! `DD Mon YYYY` form (`15 Mar 2024`).

use crate::error::{CoreError, CoreResult};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Text layout of every stored date
pub const DATE_FORMAT: &str = "%d %b %Y";

/// A calendar day (day-month-year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KycDate(NaiveDate);

impl KycDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year, month and day; `None` for impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Last day of a validity window opened on `self`.
    ///
    /// Computes `(year + 1, month, day - 1)` and lets the day overflow
    /// into neighbouring months, so 29 Feb 2024 ends on 28 Feb 2025 and
    /// 1 Mar 2024 ends on 28 Feb 2025.
    pub fn validity_end(&self) -> Self {
        let first_of_month = NaiveDate::from_ymd_opt(self.0.year() + 1, self.0.month(), 1)
            .unwrap_or(self.0);
        Self(first_of_month + Duration::days(i64::from(self.0.day()) - 2))
    }

    /// True when both dates fall in the same calendar month of the same year
    pub fn same_month_as(&self, other: &KycDate) -> bool {
        self.0.year() == other.0.year() && self.0.month() == other.0.month()
    }
}

impl fmt::Display for KycDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for KycDate {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| CoreError::InvalidDate(s.to_string()))
    }
}

impl From<NaiveDate> for KycDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for KycDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KycDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
