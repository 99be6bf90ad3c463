use crate::contract::{ContractInterface, Record};
use crate::error::{CallError, InterfaceError, ProviderError};
use crate::wallet::{Address, CallRequest, TransactionRequest, TxReceipt, WalletProvider};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

pub const RECORD_COUNT: &str = "recordCount";
pub const RECORDS: &str = "records";
pub const ADD_RECORD: &str = "addRecord";

/// A deployed MedicalRecords contract reached through a wallet provider.
///
/// Built once per session after network resolution and never mutated.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    interface: Arc<ContractInterface>,
    provider: Arc<dyn WalletProvider>,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("contract", &self.interface.contract_name)
            .finish()
    }
}

impl ContractHandle {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        address: Address,
        interface: Arc<ContractInterface>,
    ) -> Result<Self, InterfaceError> {
        interface.ensure_view(RECORD_COUNT)?;
        interface.ensure_view(RECORDS)?;
        interface.ensure_mutating(ADD_RECORD)?;

        Ok(Self {
            address,
            interface,
            provider,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub async fn record_count(&self) -> Result<u64, CallError> {
        let value = self.call(RECORD_COUNT, vec![]).await?;
        decode_uint(RECORD_COUNT, &value)
    }

    /// Reads the record at ledger `index` (1-based).
    pub async fn record(&self, index: u64) -> Result<Record, CallError> {
        let value = self.call(RECORDS, vec![json!(index)]).await?;
        // Providers hand structs back either by field name or positionally;
        // the derived deserializer takes both.
        serde_json::from_value(value).map_err(|err| CallError::Decode {
            method: RECORDS,
            reason: err.to_string(),
        })
    }

    pub async fn add_record(
        &self,
        from: &Address,
        patient_name: &str,
        medical_data: &str,
    ) -> Result<TxReceipt, ProviderError> {
        let request = TransactionRequest {
            from: from.clone(),
            to: self.address.clone(),
            method: ADD_RECORD.to_string(),
            args: vec![json!(patient_name), json!(medical_data)],
        };
        self.provider.send_transaction(&request).await
    }

    async fn call(&self, method: &'static str, args: Vec<Value>) -> Result<Value, CallError> {
        let request = CallRequest {
            to: self.address.clone(),
            method: method.to_string(),
            args,
            from: None,
        };
        self.provider
            .call(&request)
            .await
            .map_err(|source| CallError::Provider { method, source })
    }
}

/// uint256 results arrive as JSON numbers or as decimal / 0x-hex strings.
fn decode_uint(method: &'static str, value: &Value) -> Result<u64, CallError> {
    let decode_error = |reason: String| CallError::Decode { method, reason };

    match value {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| decode_error(format!("{number} is not an unsigned integer"))),
        Value::String(text) => {
            let parsed = match text.strip_prefix("0x") {
                Some(hex_digits) => u64::from_str_radix(hex_digits, 16),
                None => text.parse::<u64>(),
            };
            parsed.map_err(|err| decode_error(format!("{text:?}: {err}")))
        }
        other => Err(decode_error(format!("unexpected value {other}"))),
    }
}
