//! Client for a medical-records contract reached through a wallet provider.
//!
//! [`session::ConnectionResolver`] connects to the wallet and finds the
//! contract for the active network, [`session::LedgerReader`] reads the full
//! record list and [`session::submit`] appends a record signed by the
//! connected account. [`session::Session`] ties them together.

pub mod chain;
pub mod config;
pub mod contract;
pub mod error;
pub mod session;
pub mod wallet;

pub use config::ClientConfig;
pub use contract::{ContractHandle, ContractInterface, Record, RecordDraft, RecordSnapshot};
pub use error::{ProviderError, ReadError, ResolveError, SessionError, SubmitError};
pub use session::{ConnectionResolver, LedgerReader, Resolution, Session, SessionPhase};
pub use wallet::{Address, WalletProvider};
