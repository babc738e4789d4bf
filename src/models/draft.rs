use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::models::errors::ValidationError;
use crate::models::{Transaction, TransactionStatus};
use crate::types::{Currency, TransactionId};

/// Unvalidated create-transaction form input.
///
/// Every field arrives as free text. `validate` is the only way to turn a draft
/// into a `Transaction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionDraft {
    pub client_name: String,
    pub bank_account: String,
    /// Decimal amount, grouping commas allowed (`1,250.00`).
    pub amount: String,
    /// Defaults to INR when absent.
    pub currency: Option<String>,
    /// Defaults to pending when absent.
    pub status: Option<String>
}

impl TransactionDraft {
    pub fn validate(self, transaction_id: impl Into<TransactionId>, created_at: DateTime<Utc>) -> Result<Transaction, ValidationError> {
        let client_name = self.client_name.trim();

        if client_name.is_empty() {
            return Err(ValidationError::MissingClientName)
        }

        let bank_account = self.bank_account.trim();

        if bank_account.is_empty() {
            return Err(ValidationError::MissingBankAccount)
        }

        let amount = Decimal::from_str(&self.amount.trim().replace(',', ""))
            .map_err(|_| ValidationError::InvalidAmount(self.amount.clone()))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativeAmount(amount))
        }

        let currency = match &self.currency {
            Some(code) => Currency::from_str(code)?,
            None => Currency::default()
        };

        let status = match &self.status {
            Some(value) => TransactionStatus::from(value.as_str()),
            None => TransactionStatus::Pending
        };

        if !status.is_recognized() {
            return Err(ValidationError::UnrecognizedStatus(status.to_string()))
        }

        Ok(Transaction {
            transaction_id: transaction_id.into(),
            amount,
            currency,
            status,
            timestamp: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            client_name: client_name.to_string(),
            bank_account: bank_account.to_string()
        })
    }
}
