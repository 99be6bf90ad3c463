use crate::contract::{RecordDraft, RecordSnapshot};
use crate::error::{SessionError, SubmitError};
use crate::session::reader::LedgerReader;
use crate::session::resolver::{Connection, ConnectionResolver, Resolution, UnavailableReason};
use crate::session::submitter;
use crate::wallet::{Address, TxReceipt};
use log::{error, info, warn};
use std::fmt;

/// Top-level session state. `Ready` is the only phase in which ledger
/// operations run; reads and submissions do not leave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Resolving,
    Ready,
    Unavailable(UnavailableReason),
    ProviderMissing,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Uninitialized => f.write_str("uninitialized"),
            SessionPhase::Resolving => f.write_str("resolving"),
            SessionPhase::Ready => f.write_str("ready"),
            SessionPhase::Unavailable(reason) => write!(f, "unavailable ({reason})"),
            SessionPhase::ProviderMissing => f.write_str("missing a wallet provider"),
        }
    }
}

/// Last message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InstallWallet,
    NotDeployed(String),
    ReadFailed(String),
    Unauthorized,
    SubmissionRejected,
    SubmissionFailed(String),
    RecordAdded { transaction_hash: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InstallWallet => f.write_str("Please install a wallet provider!"),
            Notice::NotDeployed(reason) => {
                write!(f, "Smart contract not available: {reason}.")
            }
            Notice::ReadFailed(reason) => write!(f, "Could not load records: {reason}"),
            Notice::Unauthorized => {
                f.write_str("Connect an account in your wallet before adding records.")
            }
            Notice::SubmissionRejected => f.write_str("Transaction was rejected in the wallet."),
            Notice::SubmissionFailed(reason) => write!(f, "Could not add record: {reason}"),
            Notice::RecordAdded { transaction_hash } => {
                write!(f, "Record added in transaction {transaction_hash}.")
            }
        }
    }
}

pub struct Session {
    resolver: ConnectionResolver,
    reader: LedgerReader,
    phase: SessionPhase,
    connection: Option<Connection>,
    snapshot: Option<RecordSnapshot>,
    draft: RecordDraft,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(resolver: ConnectionResolver, reader: LedgerReader) -> Self {
        Self {
            resolver,
            reader,
            phase: SessionPhase::Uninitialized,
            connection: None,
            snapshot: None,
            draft: RecordDraft::default(),
            notice: None,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    pub fn account(&self) -> Option<&Address> {
        self.connection.as_ref()?.account.as_ref()
    }

    /// Last successfully read snapshot; `None` until the first read succeeds.
    pub fn snapshot(&self) -> Option<&RecordSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_patient_name(&mut self, patient_name: impl Into<String>) {
        self.draft.patient_name = patient_name.into();
    }

    pub fn set_medical_data(&mut self, medical_data: impl Into<String>) {
        self.draft.medical_data = medical_data.into();
    }

    /// Resolves the connection and, when ready, loads the initial snapshot.
    /// Runs once; later calls return the phase reached the first time.
    pub async fn start(&mut self) -> &SessionPhase {
        if self.phase != SessionPhase::Uninitialized {
            return &self.phase;
        }
        self.phase = SessionPhase::Resolving;

        match self.resolver.resolve().await {
            Resolution::Ready(connection) => {
                self.connection = Some(connection);
                self.phase = SessionPhase::Ready;
                // a failed initial read is recorded as a notice; the session
                // stays ready and the caller may refresh
                let _ = self.refresh().await;
            }
            Resolution::Unavailable(reason) => {
                error!("Ledger unavailable: {}", reason);
                self.notice = Some(Notice::NotDeployed(reason.to_string()));
                self.phase = SessionPhase::Unavailable(reason);
            }
            Resolution::ProviderMissing => {
                error!("No wallet provider; the session cannot continue");
                self.notice = Some(Notice::InstallWallet);
                self.phase = SessionPhase::ProviderMissing;
            }
        }

        &self.phase
    }

    /// Replaces the snapshot with a fresh read. On failure the previous
    /// snapshot is kept.
    pub async fn refresh(&mut self) -> Result<&RecordSnapshot, SessionError> {
        let result = {
            let connection = self.ready_connection()?;
            self.reader.read_all(&connection.handle).await
        };

        match result {
            Ok(snapshot) => {
                info!("Loaded {} records", snapshot.len());
                if matches!(self.notice, Some(Notice::ReadFailed(_))) {
                    self.notice = None;
                }
                let snapshot: &RecordSnapshot = self.snapshot.insert(snapshot);
                Ok(snapshot)
            }
            Err(err) => {
                warn!("Read pass failed: {}", err);
                self.notice = Some(Notice::ReadFailed(err.to_string()));
                Err(SessionError::Read(err))
            }
        }
    }

    /// Submits the current draft. The draft is cleared only once the
    /// provider confirms the transaction, after which the snapshot is
    /// refreshed.
    pub async fn add_record(&mut self) -> Result<TxReceipt, SessionError> {
        let result = {
            let connection = self.ready_connection()?;
            submitter::submit(&connection.handle, connection.account.as_ref(), &self.draft).await
        };

        let receipt = match result {
            Ok(receipt) => receipt,
            Err(err) => {
                self.notice = Some(match &err {
                    SubmitError::Unauthorized => Notice::Unauthorized,
                    SubmitError::Rejected => Notice::SubmissionRejected,
                    SubmitError::Failed(cause) => {
                        Notice::SubmissionFailed(cause.to_string())
                    }
                });
                return Err(SessionError::Submit(err));
            }
        };

        self.draft = RecordDraft::default();
        self.notice = Some(Notice::RecordAdded {
            transaction_hash: receipt.transaction_hash.clone(),
        });
        if let Err(err) = self.refresh().await {
            warn!("Record was added but the refresh failed: {}", err);
        }

        Ok(receipt)
    }

    fn ready_connection(&self) -> Result<&Connection, SessionError> {
        match (&self.phase, &self.connection) {
            (SessionPhase::Ready, Some(connection)) => Ok(connection),
            _ => Err(SessionError::NotReady(self.phase.clone())),
        }
    }
}
