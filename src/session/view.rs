use crate::session::{Session, SessionPhase};
use std::fmt::Write;

pub const EMPTY_LEDGER: &str = "No records found.";

/// Renders the session as the plain-text record page.
pub fn render(session: &Session) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Blockchain Medical Records");
    let account = session.account().map(|a| a.as_str()).unwrap_or("");
    let _ = writeln!(out, "Connected Account: {account}");

    if let Some(notice) = session.notice() {
        let _ = writeln!(out, "! {notice}");
    }

    if session.phase() != &SessionPhase::Ready {
        return out;
    }

    let draft = session.draft();
    let _ = writeln!(out);
    let _ = writeln!(out, "Patient Name: {}", draft.patient_name);
    let _ = writeln!(out, "Medical Data: {}", draft.medical_data);

    let _ = writeln!(out);
    let _ = writeln!(out, "Existing Records");
    // no snapshot means no read has succeeded yet; the notice says why
    match session.snapshot() {
        Some(snapshot) if snapshot.is_empty() => {
            let _ = writeln!(out, "{EMPTY_LEDGER}");
        }
        Some(snapshot) => {
            for (index, record) in snapshot.indexed() {
                let _ = writeln!(out, "#{index} {}", record.patient_name);
                let _ = writeln!(out, "   Doctor: {}", record.doctor);
                let _ = writeln!(out, "   Medical Data: {}", record.medical_data);
            }
        }
        None => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractInterface;
    use crate::session::{ConnectionResolver, LedgerReader};
    use crate::wallet::{Address, DevProvider, Faults, WalletProvider};
    use std::sync::Arc;

    async fn dev_provider(network_id: u64) -> Arc<DevProvider> {
        Arc::new(
            DevProvider::new(
                network_id,
                Address::from("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
                1,
            )
            .await,
        )
    }

    async fn started(network_id: u64) -> Session {
        started_with(dev_provider(network_id).await).await
    }

    async fn started_with(provider: Arc<DevProvider>) -> Session {
        let provider: Arc<dyn WalletProvider> = provider;
        let resolver = ConnectionResolver::new(
            Some(provider),
            Arc::new(ContractInterface::bundled().unwrap()),
        );
        let mut session = Session::new(resolver, LedgerReader::default());
        session.start().await;
        session
    }

    #[tokio::test]
    async fn empty_ledger_shows_no_records_found() {
        let session = started(5777).await;
        let page = render(&session);

        assert!(page.contains("Existing Records"));
        assert!(page.contains(EMPTY_LEDGER));
    }

    #[tokio::test]
    async fn records_render_as_cards() {
        let mut session = started(5777).await;
        session.set_patient_name("Alice");
        session.set_medical_data("flu, 2024");
        session.add_record().await.unwrap();

        let page = render(&session);
        assert!(page.contains("#1 Alice"));
        assert!(page.contains("Medical Data: flu, 2024"));
        assert!(!page.contains(EMPTY_LEDGER));
    }

    #[tokio::test]
    async fn failed_initial_read_is_not_shown_as_empty() {
        let provider = dev_provider(5777).await;
        provider
            .set_faults(Faults {
                fail_count: true,
                ..Faults::default()
            })
            .await;
        let session = started_with(provider).await;
        let page = render(&session);

        assert!(page.contains("Could not load records"));
        assert!(page.contains("Existing Records"));
        assert!(!page.contains(EMPTY_LEDGER));
    }

    #[tokio::test]
    async fn unavailable_session_shows_only_the_notice() {
        let session = started(42).await;
        let page = render(&session);

        assert!(page.contains("Smart contract not available"));
        assert!(!page.contains("Existing Records"));
    }
}
