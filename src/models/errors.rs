use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Transaction;
use crate::types::{CurrencyError, TransactionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueReason {
    #[error("timestamp [{0}] could not be parsed")]
    MalformedTimestamp(String),
    #[error("amount [{0}] is negative")]
    NegativeAmount(Decimal),
    #[error("status [{0}] is not recognized")]
    UnrecognizedStatus(String),
    #[error("client name is empty")]
    MissingClientName,
    #[error("amount [{0}] overflows the accumulated volume")]
    VolumeOverflow(Decimal)
}

/// One malformed record, excluded from the result and reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Data quality issue for transaction [{transaction_id}]: {reason}")]
pub struct DataQualityIssue {
    pub transaction_id: TransactionId,
    pub reason: IssueReason
}

impl DataQualityIssue {
    pub fn malformed_timestamp(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            reason: IssueReason::MalformedTimestamp(tx.timestamp.clone())
        }
    }

    pub fn negative_amount(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            reason: IssueReason::NegativeAmount(tx.amount)
        }
    }

    pub fn unrecognized_status(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            reason: IssueReason::UnrecognizedStatus(tx.status.to_string())
        }
    }

    pub fn missing_client_name(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            reason: IssueReason::MissingClientName
        }
    }

    pub fn volume_overflow(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            reason: IssueReason::VolumeOverflow(tx.amount)
        }
    }
}

/// Non-fatal condition raised while filtering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryWarning {
    #[error("Invalid criteria: date range start [{start}] is after end [{end}]")]
    InvalidCriteria {
        start: NaiveDate,
        end: NaiveDate
    },
    #[error(transparent)]
    DataQuality(#[from] DataQualityIssue)
}

/// Rejection of a create-transaction draft at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Validation error: client name is required")]
    MissingClientName,
    #[error("Validation error: bank account is required")]
    MissingBankAccount,
    #[error("Validation error: amount [{0}] is not a valid decimal")]
    InvalidAmount(String),
    #[error("Validation error: amount [{0}] must not be negative")]
    NegativeAmount(Decimal),
    #[error("Validation error: {0}")]
    Currency(#[from] CurrencyError),
    #[error("Validation error: status [{0}] is not recognized")]
    UnrecognizedStatus(String)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaParseError {
    #[error("Unknown status filter [{0}], expected one of: all, success, pending, failed")]
    UnknownStatus(String),
    #[error("Unknown time range [{0}], expected one of: today, 7d, 30d, 90d, month, all")]
    UnknownTimeRange(String)
}
