use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use csv::{ReaderBuilder, Trim};
use tokio::task::spawn_blocking;
use tracing::{error, info};

use crate::models::Transaction;
use crate::storage::{MemoryStore, StoreError};

/// Loads a transaction CSV into `store`, returning how many rows were recorded.
///
/// Expected header: `transaction_id,account_id,date,amount,category,merchant,location`
/// with RFC 3339 dates. Rows that fail to deserialize are logged and skipped.
pub async fn load_csv(path: impl Into<PathBuf>, store: Arc<MemoryStore>) -> Result<usize, StoreError> {
    let path = path.into();

    let handle = spawn_blocking(move || -> Result<usize, StoreError> {
        let file = File::open(&path).map_err(csv::Error::from)?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(BufReader::new(file));

        let mut loaded = 0;

        for result in reader.deserialize::<Transaction>() {
            match result {
                Ok(transaction) => {
                    store.add_transaction(transaction);
                    loaded += 1;
                }
                Err(error) => {
                    error!("CSV deserialization error in {}: {error}", path.display());
                }
            }
        }

        info!("Loaded {loaded} transactions from {}", path.display());

        Ok(loaded)
    });

    handle.await.map_err(|error| StoreError::Unavailable(format!("CSV ingestion task failed: {error}")))?
}
