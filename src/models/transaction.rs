use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TransactionStatus;
use crate::types::{Currency, TransactionId};

const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A single payment event as delivered by the upstream source.
///
/// The record is read-only to the query engine. `status` and `timestamp` are kept
/// as recorded so that malformed values reach the engine and can be reported
/// instead of silently disappearing at the ingest boundary.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    #[serde(rename = "id")]
    pub transaction_id: TransactionId,
    /// Amount in major currency units, kept at its recorded scale.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: Currency,
    pub status: TransactionStatus,
    /// ISO-8601 instant, e.g. `2024-03-01T10:15:00Z`.
    pub timestamp: String,
    /// Merchant or customer display name.
    #[serde(rename = "client")]
    pub client_name: String,
    /// Masked bank account label, e.g. `HDFC Bank ****4521`.
    pub bank_account: String
}

impl Transaction {
    /// Resolves the calendar date of the timestamp as observed at `offset`.
    ///
    /// Accepts ISO-8601 extended dates with a `T` separated time of minute or second
    /// precision, optionally followed by `Z` or a `+hh:mm`/`+hhmm` offset. Instants
    /// carrying an offset are converted into the reference offset before
    /// truncation. Timestamps without an offset, and bare dates, are taken to
    /// already be in the reference offset.
    pub fn date_in(&self, offset: &FixedOffset) -> Option<NaiveDate> {
        let raw = self.timestamp.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(instant.with_timezone(offset).date_naive())
        }

        let zoned = match raw.strip_suffix(['Z', 'z']) {
            Some(local) => format!("{local}+0000"),
            None => raw.to_string()
        };

        for format in ZONED_FORMATS {
            if let Ok(instant) = DateTime::parse_from_str(&zoned, format) {
                return Some(instant.with_timezone(offset).date_naive())
            }
        }

        for format in LOCAL_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.date())
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    /// Case-insensitive substring test against client name or bank account label.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_term(&self, needle: &str) -> bool {
        self.client_name.to_lowercase().contains(needle)
            || self.bank_account.to_lowercase().contains(needle)
    }
}
