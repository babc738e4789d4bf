mod criteria;
mod draft;
mod errors;
mod summary;
mod transaction;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};

pub use criteria::{DateRange, FilterCriteria, StatusFilter, TimeRange};
pub use draft::TransactionDraft;
pub use errors::{CriteriaParseError, DataQualityIssue, IssueReason, QueryWarning, ValidationError};
pub use summary::{AggregateSummary, PeriodComparison, StatusCounts, VolumeBucket};
pub use transaction::Transaction;

/// Settlement state of a payment as recorded by the upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Success,
    Pending,
    Failed,
    /// Any value outside the known set, kept verbatim so it can be reported.
    Unrecognized(String)
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Unrecognized(value) => value.as_str()
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, TransactionStatus::Unrecognized(_))
    }
}

impl From<&str> for TransactionStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "success" => TransactionStatus::Success,
            "pending" => TransactionStatus::Pending,
            "failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Unrecognized(value.trim().to_string())
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(TransactionStatus::from(value.as_str()))
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
