pub mod handle;
pub mod interface;
pub mod record;

pub use handle::ContractHandle;
pub use interface::{AbiEntry, ContractInterface, NetworkDeployment, StateMutability};
pub use record::{Record, RecordDraft, RecordSnapshot};
