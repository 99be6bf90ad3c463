pub mod reader;
pub mod resolver;
pub mod state;
pub mod submitter;
pub mod view;

pub use reader::LedgerReader;
pub use resolver::{Connection, ConnectionResolver, Resolution, UnavailableReason};
pub use state::{Notice, Session, SessionPhase};
pub use submitter::submit;
pub use view::render;
