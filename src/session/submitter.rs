use crate::contract::{ContractHandle, RecordDraft};
use crate::error::SubmitError;
use crate::wallet::{Address, TxReceipt};
use log::{info, warn};

/// Submits `draft` as a new record signed by `account`.
///
/// Succeeds once the provider reports the transaction included. The ledger,
/// not this function, is responsible for the record actually appearing; call
/// the reader again to observe it.
pub async fn submit(
    handle: &ContractHandle,
    account: Option<&Address>,
    draft: &RecordDraft,
) -> Result<TxReceipt, SubmitError> {
    let Some(account) = account else {
        warn!("Refusing to submit a record without an authorized account");
        return Err(SubmitError::Unauthorized);
    };

    match handle
        .add_record(account, &draft.patient_name, &draft.medical_data)
        .await
    {
        Ok(receipt) => {
            info!(
                "Record submitted in tx {} (block {})",
                receipt.transaction_hash, receipt.block_number
            );
            Ok(receipt)
        }
        Err(err) => {
            warn!("Record submission from {} failed: {}", account, err);
            Err(SubmitError::from(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractInterface;
    use crate::session::LedgerReader;
    use crate::wallet::{DevProvider, Faults, WalletProvider};
    use std::sync::Arc;

    const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

    async fn connect() -> (Arc<DevProvider>, ContractHandle, Address) {
        let provider = Arc::new(DevProvider::new(5777, Address::from(CONTRACT), 2).await);
        let account = provider.request_accounts().await.unwrap().remove(0);
        let dyn_provider: Arc<dyn WalletProvider> = provider.clone();
        let handle = ContractHandle::new(
            dyn_provider,
            Address::from(CONTRACT),
            Arc::new(ContractInterface::bundled().unwrap()),
        )
        .unwrap();
        (provider, handle, account)
    }

    #[tokio::test]
    async fn unset_account_never_reaches_the_provider() {
        let (provider, handle, _) = connect().await;

        let result = submit(&handle, None, &RecordDraft::new("Alice", "flu")).await;

        assert_eq!(result, Err(SubmitError::Unauthorized));
        assert_eq!(provider.sent_transactions(), 0);
        assert_eq!(provider.ledger().record_count().await, 0);
    }

    #[tokio::test]
    async fn submitted_record_is_readable_at_new_highest_index() {
        let (provider, handle, account) = connect().await;
        submit(&handle, Some(&account), &RecordDraft::new("Bob", "fracture"))
            .await
            .unwrap();

        let receipt = submit(&handle, Some(&account), &RecordDraft::new("Alice", "flu, 2024"))
            .await
            .unwrap();
        assert_eq!(receipt.from, account);
        assert_eq!(provider.sent_transactions(), 2);

        let snapshot = LedgerReader::default().read_all(&handle).await.unwrap();
        let (index, latest) = snapshot.latest().unwrap();
        assert_eq!(index, 2);
        assert_eq!(latest.patient_name, "Alice");
        assert_eq!(latest.medical_data, "flu, 2024");
        assert_eq!(latest.doctor, account.to_string());
    }

    #[tokio::test]
    async fn empty_fields_are_passed_through() {
        let (provider, handle, account) = connect().await;

        submit(&handle, Some(&account), &RecordDraft::default())
            .await
            .unwrap();

        let record = provider.ledger().record(1).await;
        assert!(record.patient_name.is_empty());
        assert!(record.medical_data.is_empty());
    }

    #[tokio::test]
    async fn user_rejection_is_distinguished_from_failure() {
        let (provider, handle, account) = connect().await;
        provider
            .set_faults(Faults {
                reject_transactions: true,
                ..Faults::default()
            })
            .await;

        let result = submit(&handle, Some(&account), &RecordDraft::new("Alice", "flu")).await;
        assert_eq!(result, Err(SubmitError::Rejected));
        assert_eq!(provider.ledger().record_count().await, 0);
    }

    #[tokio::test]
    async fn revoked_authorization_is_unauthorized() {
        let (provider, handle, account) = connect().await;
        provider.revoke_authorization();

        let result = submit(&handle, Some(&account), &RecordDraft::new("Alice", "flu")).await;
        assert_eq!(result, Err(SubmitError::Unauthorized));
        assert_eq!(provider.sent_transactions(), 1);
        assert_eq!(provider.ledger().record_count().await, 0);
    }
}
