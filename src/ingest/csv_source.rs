use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tokio::task::spawn_blocking;
use tracing::{error, info};

use crate::ingest::{IngestError, Ingested, RejectedRecord};
use crate::models::Transaction;

/// Loads every transaction from the CSV file at `path`.
///
/// The read happens on the blocking pool and resolves only once the whole file has
/// been consumed. Rows that fail to deserialize are skipped and reported in
/// `Ingested::rejected`; only an unreadable file is an error.
pub async fn load(path: impl AsRef<Path>) -> Result<Ingested, IngestError> {
    let path = path.as_ref().to_path_buf();

    spawn_blocking(move || {
        let file = File::open(&path).map_err(|source| IngestError::Open { path: path.clone(), source })?;
        let ingested = read_from(BufReader::new(file));

        info!(
            "Loaded [{}] transactions from [{}], rejected [{}] rows",
            ingested.transactions.len(), path.display(), ingested.rejected.len()
        );

        Ok(ingested)
    }).await?
}

/// Reads transactions from any CSV source with the standard header.
pub fn read_from<R: Read>(reader: R) -> Ingested {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut ingested = Ingested::default();

    for result in reader.deserialize::<Transaction>() {
        match result {
            Ok(transaction) => ingested.transactions.push(transaction),
            Err(error) => {
                let line = error.position().map(|position| position.line());
                error!("CSV deserialization error: {error}");
                ingested.rejected.push(RejectedRecord { line, message: error.to_string() });
            }
        }
    }

    ingested
}
