use crate::wallet::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCall {
    AddRecord {
        patient_name: String,
        medical_data: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub tx_hash: String,
    pub from: Address,
    pub to: Address,
    pub nonce: u64,
    pub call: LedgerCall,
    pub timestamp: DateTime<Utc>,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    from: &'a Address,
    to: &'a Address,
    nonce: u64,
    call: &'a LedgerCall,
}

impl LedgerTransaction {
    pub fn new(from: Address, to: Address, nonce: u64, call: LedgerCall) -> Self {
        Self {
            tx_hash: String::new(),
            from,
            to,
            nonce,
            call,
            timestamp: Utc::now(),
            public_key: vec![],
            signature: vec![],
        }
    }

    /// Canonical bytes covered by the sender's signature.
    pub fn signing_payload(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&SigningPayload {
            from: &self.from,
            to: &self.to,
            nonce: self.nonce,
            call: &self.call,
        })
    }

    pub fn attach_signature(&mut self, public_key: Vec<u8>, signature: Vec<u8>) {
        self.public_key = public_key;
        self.signature = signature;
        self.tx_hash = self.compute_hash();
    }

    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.from.as_str());
        hasher.update(self.to.as_str());
        hasher.update(self.nonce.to_be_bytes());
        hasher.update(&self.signature);
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_record(nonce: u64) -> LedgerTransaction {
        LedgerTransaction::new(
            Address::from("0xa11ce"),
            Address::from("0xc0ffee"),
            nonce,
            LedgerCall::AddRecord {
                patient_name: "Alice".to_string(),
                medical_data: "flu, 2024".to_string(),
            },
        )
    }

    #[test]
    fn signing_payload_covers_nonce_and_call() {
        let first = add_record(0).signing_payload().unwrap();
        let second = add_record(1).signing_payload().unwrap();
        assert_ne!(first, second);
        assert_eq!(first, add_record(0).signing_payload().unwrap());
    }

    #[test]
    fn hash_is_set_when_signed() {
        let mut tx = add_record(0);
        assert!(tx.tx_hash.is_empty());

        tx.attach_signature(vec![1; 32], vec![2; 64]);
        assert!(tx.tx_hash.starts_with("0x"));
        assert_eq!(tx.tx_hash.len(), 66);
        assert_eq!(tx.tx_hash, tx.compute_hash());
    }
}
