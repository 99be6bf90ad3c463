use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub type NetworkId = u64;

/// Hex account or contract address as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex addresses compare case-insensitively (checksummed vs lowercase forms).
    pub fn matches(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub to: Address,
    pub method: String,
    pub args: Vec<Value>,
    pub from: Option<Address>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub method: String,
    pub args: Vec<Value>,
}

/// Confirmation that a signed transaction was accepted and included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
    pub from: Address,
}

/// Capability exposed by a wallet: account authorization, network selection,
/// read-only contract calls and signed state-changing transactions.
///
/// Every method is a suspension point handed to the wallet or the network.
/// None of them carries a timeout.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Prompts the user to authorize accounts for this client.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Accounts currently exposed to this client, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    async fn network_id(&self) -> Result<NetworkId, ProviderError>;

    async fn call(&self, request: &CallRequest) -> Result<Value, ProviderError>;

    /// Signs `request` as `request.from` and waits for inclusion.
    async fn send_transaction(&self, request: &TransactionRequest)
    -> Result<TxReceipt, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_match_regardless_of_case() {
        let lower = Address::from("0x5fbdb2315678afecb367f032d93f642f64180aa3");
        let mixed = Address::from("0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert!(lower.matches(&mixed));
        assert_ne!(lower, mixed);
    }

    #[test]
    fn receipt_serializes_with_provider_field_names() {
        let receipt = TxReceipt {
            transaction_hash: "0xabc".to_string(),
            block_number: 7,
            from: Address::from("0x01"),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["transactionHash"], "0xabc");
        assert_eq!(json["blockNumber"], 7);
    }
}
