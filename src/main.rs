use anyhow::Context;
use medrec_ledger::contract::handle::ADD_RECORD;
use medrec_ledger::session::render;
use medrec_ledger::wallet::{DevProvider, TransactionRequest};
use medrec_ledger::{
    Address, ClientConfig, ConnectionResolver, LedgerReader, Session, SessionPhase,
    WalletProvider,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Address the dev ledger uses when the artifact has no deployment for the
/// configured network, so the session ends up unavailable.
fn undeployed_address() -> Address {
    let digest = Sha256::digest(b"medrec-ledger/undeployed");
    Address::new(format!("0x{}", hex::encode(&digest[..20])))
}

async fn seed_ledger(provider: &DevProvider, contract: &Address) -> anyhow::Result<()> {
    let accounts = provider.request_accounts().await?;
    let Some(colleague) = accounts.get(1) else {
        return Ok(());
    };

    let request = TransactionRequest {
        from: colleague.clone(),
        to: contract.clone(),
        method: ADD_RECORD.to_string(),
        args: vec![json!("Bob Smith"), json!("Fractured left wrist, cast applied")],
    };
    provider
        .send_transaction(&request)
        .await
        .context("seeding the dev ledger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    println!("\n");
    println!("╔═══════════════════════════════════════════════════════╗");
    println!("║                                                       ║");
    println!("║          Blockchain Medical Records Client            ║");
    println!("║                                                       ║");
    println!("╚═══════════════════════════════════════════════════════╝");
    println!("\n");

    let interface = Arc::new(config.load_interface()?);
    let contract = interface
        .address_for(config.dev_network_id)
        .unwrap_or_else(undeployed_address);

    println!("Starting development wallet...");
    println!("  → Network id: {}", config.dev_network_id);
    println!("  → Contract: {} at {}", interface.contract_name, contract);
    println!("  → 2 local accounts\n");

    let provider = Arc::new(DevProvider::new(config.dev_network_id, contract.clone(), 2).await);
    seed_ledger(&provider, &contract).await?;

    let wallet: Arc<dyn WalletProvider> = provider.clone();
    let resolver = ConnectionResolver::new(Some(wallet), interface);
    let mut session = Session::new(resolver, LedgerReader::new(config.read_warn_threshold));

    let phase = session.start().await.clone();
    println!("{}", render(&session));

    if phase != SessionPhase::Ready {
        println!("✗ Session ended: {}", phase);
        return Ok(());
    }

    println!("Adding a record from the connected account...\n");
    session.set_patient_name("Alice Johnson");
    session.set_medical_data("Influenza A, prescribed oseltamivir 75mg");
    match session.add_record().await {
        Ok(receipt) => println!(
            "✓ Included in block {} ({})\n",
            receipt.block_number, receipt.transaction_hash
        ),
        Err(e) => println!("✗ Could not add record: {}\n", e),
    }

    println!("{}", render(&session));
    Ok(())
}
