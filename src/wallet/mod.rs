pub mod dev;
pub mod keystore;
pub mod provider;

pub use dev::{DevProvider, Faults};
pub use keystore::Keystore;
pub use provider::{
    Address, CallRequest, NetworkId, TransactionRequest, TxReceipt, WalletProvider,
};
