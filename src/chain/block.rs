use super::transaction::LedgerTransaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<LedgerTransaction>,
    pub previous_hash: String,
    pub hash: String,
}

impl Block {
    pub fn genesis() -> Self {
        Self {
            number: 0,
            timestamp: Utc::now(),
            transactions: vec![],
            previous_hash: "0x0".to_string(),
            hash: "genesis_hash".to_string(),
        }
    }

    /// Builds the next block over `transactions`. The dev ledger seals one
    /// block per accepted transaction, so there is no proof-of-work.
    pub fn seal(number: u64, transactions: Vec<LedgerTransaction>, previous_hash: String) -> Self {
        let timestamp = Utc::now();

        let mut hasher = Sha256::new();
        hasher.update(number.to_be_bytes());
        hasher.update(timestamp.to_rfc3339());
        hasher.update(&previous_hash);
        for tx in &transactions {
            hasher.update(&tx.tx_hash);
        }

        Self {
            number,
            timestamp,
            transactions,
            previous_hash,
            hash: format!("0x{}", hex::encode(hasher.finalize())),
        }
    }
}
