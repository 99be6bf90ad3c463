pub mod block;
pub mod ledger;
pub mod transaction;

pub use block::Block;
pub use ledger::{Inclusion, LedgerError, RecordLedger};
pub use transaction::{LedgerCall, LedgerTransaction};
