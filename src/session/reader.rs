use crate::contract::{ContractHandle, RecordSnapshot};
use crate::error::ReadError;
use log::{debug, warn};

pub const DEFAULT_READ_WARN_THRESHOLD: u64 = 500;

/// Bulk reader for the ledger's record list.
///
/// A pass reads the count once and then fetches indices `1..=count` one
/// round trip at a time. The ledger offers no pass-level consistency, so a
/// record appended mid-pass is simply not part of this snapshot, and the
/// loop stays sequential.
pub struct LedgerReader {
    warn_threshold: u64,
}

impl LedgerReader {
    pub fn new(warn_threshold: u64) -> Self {
        Self { warn_threshold }
    }

    pub async fn read_all(&self, handle: &ContractHandle) -> Result<RecordSnapshot, ReadError> {
        let count = handle.record_count().await.map_err(ReadError::Count)?;
        if count > self.warn_threshold {
            warn!(
                "Reading {} records with one call each; expect a slow refresh",
                count
            );
        }

        let capacity = usize::try_from(count.min(self.warn_threshold)).unwrap_or(0);
        let mut records = Vec::with_capacity(capacity);
        for index in 1..=count {
            let record = handle
                .record(index)
                .await
                .map_err(|source| ReadError::Record {
                    index,
                    count,
                    source,
                })?;
            records.push(record);
        }

        debug!("Read pass complete: {} records from {}", count, handle.address());
        Ok(RecordSnapshot::new(records))
    }
}

impl Default for LedgerReader {
    fn default() -> Self {
        Self::new(DEFAULT_READ_WARN_THRESHOLD)
    }
}
