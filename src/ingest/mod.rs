mod csv_source;

use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

use crate::models::Transaction;

pub use csv_source::{load, read_from};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unable to open transactions at path [{}]: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("Transaction loader task failed: {0}")]
    Task(#[from] JoinError)
}

/// A CSV row that could not be turned into a `Transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// 1-based line number in the source, when known.
    pub line: Option<u64>,
    pub message: String
}

/// A fully loaded batch, in source order.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedRecord>
}
