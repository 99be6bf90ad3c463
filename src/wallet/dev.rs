use crate::chain::{LedgerCall, LedgerTransaction, RecordLedger};
use crate::contract::handle::{ADD_RECORD, RECORD_COUNT, RECORDS};
use crate::error::ProviderError;
use crate::wallet::{
    Address, CallRequest, Keystore, NetworkId, TransactionRequest, TxReceipt, WalletProvider,
};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Failure modes the development wallet can be told to exhibit.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// The user dismisses the account authorization prompt.
    pub deny_authorization: bool,
    /// While unauthorized, still expose the first account as a default.
    pub expose_default_account: bool,
    /// The user dismisses every transaction prompt.
    pub reject_transactions: bool,
    /// `recordCount` fails.
    pub fail_count: bool,
    /// `records(i)` fails for this index.
    pub fail_read_at: Option<u64>,
}

/// Wallet and chain in one process: a keystore of local accounts in front of
/// a [`RecordLedger`]. Transactions are sealed into a block as soon as they
/// are sent.
pub struct DevProvider {
    network_id: AtomicU64,
    keystore: Keystore,
    ledger: Arc<RecordLedger>,
    authorized: AtomicBool,
    faults: RwLock<Faults>,
    read_calls: AtomicU64,
    sent_transactions: AtomicU64,
}

impl DevProvider {
    pub async fn new(network_id: NetworkId, contract_address: Address, accounts: usize) -> Self {
        let provider = Self::with_ledger(network_id, Arc::new(RecordLedger::new(contract_address)));
        for _ in 0..accounts {
            provider.keystore.generate_account().await;
        }
        provider
    }

    /// A provider over an existing ledger, with no accounts yet.
    pub fn with_ledger(network_id: NetworkId, ledger: Arc<RecordLedger>) -> Self {
        Self {
            network_id: AtomicU64::new(network_id),
            keystore: Keystore::new(),
            ledger,
            authorized: AtomicBool::new(false),
            faults: RwLock::new(Faults::default()),
            read_calls: AtomicU64::new(0),
            sent_transactions: AtomicU64::new(0),
        }
    }

    pub fn keystore(&self) -> &Keystore {
        &self.keystore
    }

    pub fn ledger(&self) -> Arc<RecordLedger> {
        self.ledger.clone()
    }

    pub async fn set_faults(&self, faults: Faults) {
        *self.faults.write().await = faults;
    }

    pub fn switch_network(&self, network_id: NetworkId) {
        self.network_id.store(network_id, Ordering::SeqCst);
    }

    /// Revokes authorization, as if the user disconnected the site.
    pub fn revoke_authorization(&self) {
        self.authorized.store(false, Ordering::SeqCst);
    }

    pub fn read_calls(&self) -> u64 {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn sent_transactions(&self) -> u64 {
        self.sent_transactions.load(Ordering::SeqCst)
    }

    fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    fn internal_error(message: impl Into<String>) -> ProviderError {
        ProviderError::from_code(ProviderError::INTERNAL, message)
    }

    fn decode_call(request: &TransactionRequest) -> Result<LedgerCall, ProviderError> {
        if request.method != ADD_RECORD {
            return Err(ProviderError::from_code(
                ProviderError::METHOD_NOT_FOUND,
                format!("contract has no state-changing method `{}`", request.method),
            ));
        }
        match request.args.as_slice() {
            [Value::String(patient_name), Value::String(medical_data)] => {
                Ok(LedgerCall::AddRecord {
                    patient_name: patient_name.clone(),
                    medical_data: medical_data.clone(),
                })
            }
            _ => Err(ProviderError::from_code(
                ProviderError::INVALID_PARAMS,
                "addRecord expects (string, string)",
            )),
        }
    }
}

fn index_arg(args: &[Value]) -> Result<u64, ProviderError> {
    let parsed = match args {
        [Value::Number(number)] => number.as_u64(),
        [Value::String(text)] => text.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ProviderError::from_code(ProviderError::INVALID_PARAMS, "records expects (uint256)")
    })
}

#[async_trait]
impl WalletProvider for DevProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        if self.faults.read().await.deny_authorization {
            info!("Account authorization denied by user");
            return Err(ProviderError::UserRejected);
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(self.keystore.accounts().await)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let accounts = self.keystore.accounts().await;
        if self.is_authorized() {
            return Ok(accounts);
        }
        if self.faults.read().await.expose_default_account {
            return Ok(accounts.into_iter().take(1).collect());
        }
        Ok(vec![])
    }

    async fn network_id(&self) -> Result<NetworkId, ProviderError> {
        Ok(self.network_id.load(Ordering::SeqCst))
    }

    async fn call(&self, request: &CallRequest) -> Result<Value, ProviderError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        if !request.to.matches(self.ledger.contract_address()) {
            return Err(ProviderError::from_code(
                ProviderError::EXECUTION_REVERTED,
                format!("no contract code at {}", request.to),
            ));
        }

        let faults = self.faults.read().await.clone();
        match request.method.as_str() {
            RECORD_COUNT => {
                if faults.fail_count {
                    return Err(Self::internal_error("recordCount call failed"));
                }
                // uint256 comes back as a decimal string, like most providers
                Ok(json!(self.ledger.record_count().await.to_string()))
            }
            RECORDS => {
                let index = index_arg(&request.args)?;
                if faults.fail_read_at == Some(index) {
                    return Err(Self::internal_error(format!("records({index}) call failed")));
                }
                let record = self.ledger.record(index).await;
                serde_json::to_value(record).map_err(|err| Self::internal_error(err.to_string()))
            }
            other => Err(ProviderError::from_code(
                ProviderError::METHOD_NOT_FOUND,
                format!("contract has no read-only method `{other}`"),
            )),
        }
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxReceipt, ProviderError> {
        self.sent_transactions.fetch_add(1, Ordering::SeqCst);

        if !self.is_authorized() || !self.keystore.contains(&request.from).await {
            return Err(ProviderError::Unauthorized(request.from.to_string()));
        }
        if self.faults.read().await.reject_transactions {
            info!("Transaction from {} rejected by user", request.from);
            return Err(ProviderError::UserRejected);
        }

        let call = Self::decode_call(request)?;
        let nonce = self.ledger.nonce(&request.from).await;
        let mut tx = LedgerTransaction::new(request.from.clone(), request.to.clone(), nonce, call);

        let payload = tx
            .signing_payload()
            .map_err(|err| Self::internal_error(err.to_string()))?;
        let signed = self
            .keystore
            .sign(&request.from, &payload)
            .await
            .ok_or_else(|| ProviderError::Unauthorized(request.from.to_string()))?;
        tx.attach_signature(signed.public_key, signed.signature);

        let inclusion = self.ledger.apply(tx).await.map_err(|err| {
            ProviderError::from_code(ProviderError::EXECUTION_REVERTED, err.to_string())
        })?;
        debug!(
            "Transaction {} included in block {}",
            inclusion.transaction_hash, inclusion.block_number
        );

        Ok(TxReceipt {
            transaction_hash: inclusion.transaction_hash,
            block_number: inclusion.block_number,
            from: request.from.clone(),
        })
    }
}
