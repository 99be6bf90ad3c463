use super::block::Block;
use super::transaction::{LedgerCall, LedgerTransaction};
use crate::contract::Record;
use crate::wallet::Address;
use crate::wallet::keystore::recover_signer;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transaction is addressed to {0}, which is not this contract")]
    WrongContract(Address),

    #[error("invalid transaction signature")]
    InvalidSignature,

    #[error("signature does not belong to sender {0}")]
    SenderMismatch(Address),

    #[error("nonce {got} does not match expected {expected}")]
    BadNonce { expected: u64, got: u64 },

    #[error("failed to encode transaction: {0}")]
    Encoding(#[from] bincode::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    pub transaction_hash: String,
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
}

/// In-process chain hosting a single MedicalRecords contract.
///
/// Records are stored in append order; ledger index `i` is `records[i - 1]`.
pub struct RecordLedger {
    contract_address: Address,
    chain: RwLock<Vec<Block>>,
    records: RwLock<Vec<Record>>,
    nonces: RwLock<HashMap<String, u64>>,
}

impl RecordLedger {
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            chain: RwLock::new(vec![Block::genesis()]),
            records: RwLock::new(Vec::new()),
            nonces: RwLock::new(HashMap::new()),
        }
    }

    pub fn contract_address(&self) -> &Address {
        &self.contract_address
    }

    pub async fn record_count(&self) -> u64 {
        self.records.read().await.len() as u64
    }

    /// Public mapping getter semantics: an index with no record yields the
    /// zero value rather than an error.
    pub async fn record(&self, index: u64) -> Record {
        let records = self.records.read().await;
        index
            .checked_sub(1)
            .and_then(|position| usize::try_from(position).ok())
            .and_then(|position| records.get(position).cloned())
            .unwrap_or_else(|| Record {
                patient_name: String::new(),
                doctor: ZERO_ADDRESS.to_string(),
                medical_data: String::new(),
            })
    }

    pub async fn nonce(&self, account: &Address) -> u64 {
        self.nonces
            .read()
            .await
            .get(&account.as_str().to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub async fn height(&self) -> u64 {
        self.chain
            .read()
            .await
            .last()
            .map(|block| block.number)
            .unwrap_or(0)
    }

    pub async fn apply(&self, tx: LedgerTransaction) -> Result<Inclusion, LedgerError> {
        if !tx.to.matches(&self.contract_address) {
            return Err(LedgerError::WrongContract(tx.to.clone()));
        }

        let payload = tx.signing_payload()?;
        let signer = recover_signer(&tx.public_key, &payload, &tx.signature)
            .ok_or(LedgerError::InvalidSignature)?;
        if !signer.matches(&tx.from) {
            return Err(LedgerError::SenderMismatch(tx.from.clone()));
        }

        // Held for the whole apply so transactions are executed one at a time.
        let mut nonces = self.nonces.write().await;
        let sender_key = tx.from.as_str().to_ascii_lowercase();
        let expected = nonces.get(&sender_key).copied().unwrap_or(0);
        if tx.nonce != expected {
            return Err(LedgerError::BadNonce {
                expected,
                got: tx.nonce,
            });
        }

        match &tx.call {
            LedgerCall::AddRecord {
                patient_name,
                medical_data,
            } => {
                let mut records = self.records.write().await;
                records.push(Record {
                    patient_name: patient_name.clone(),
                    doctor: tx.from.to_string(),
                    medical_data: medical_data.clone(),
                });
                debug!("record {} added by {}", records.len(), tx.from);
            }
        }
        nonces.insert(sender_key, expected + 1);

        let mut chain = self.chain.write().await;
        let (number, previous_hash) = match chain.last() {
            Some(previous) => (previous.number + 1, previous.hash.clone()),
            None => (0, "0x0".to_string()),
        };
        let transaction_hash = tx.tx_hash.clone();
        let block = Block::seal(number, vec![tx], previous_hash);
        let inclusion = Inclusion {
            transaction_hash,
            block_number: block.number,
            timestamp: block.timestamp,
        };
        chain.push(block);

        Ok(inclusion)
    }
}
