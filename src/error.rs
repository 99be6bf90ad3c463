use crate::session::{SessionPhase, UnavailableReason};
use thiserror::Error;

/// Errors reported by a wallet provider, following the EIP-1193 code space.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("user rejected the request")]
    UserRejected,

    #[error("account is not authorized: {0}")]
    Unauthorized(String),

    #[error("provider is disconnected")]
    Disconnected,

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl ProviderError {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const DISCONNECTED: i64 = 4900;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INTERNAL: i64 = -32603;
    pub const EXECUTION_REVERTED: i64 = -32000;

    pub fn from_code(code: i64, message: impl Into<String>) -> Self {
        match code {
            Self::USER_REJECTED => ProviderError::UserRejected,
            Self::UNAUTHORIZED => ProviderError::Unauthorized(message.into()),
            Self::DISCONNECTED => ProviderError::Disconnected,
            _ => ProviderError::Rpc {
                code,
                message: message.into(),
            },
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ProviderError::UserRejected => Self::USER_REJECTED,
            ProviderError::Unauthorized(_) => Self::UNAUTHORIZED,
            ProviderError::Disconnected => Self::DISCONNECTED,
            ProviderError::Rpc { code, .. } => *code,
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ProviderError::UserRejected)
    }
}

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("malformed contract artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read contract artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("contract interface has no function `{0}`")]
    MissingFunction(String),

    #[error("function `{name}` is {actual}, expected {expected}")]
    WrongMutability {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Failure of a single contract call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("call to `{method}` failed: {source}")]
    Provider {
        method: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("could not decode result of `{method}`: {reason}")]
    Decode {
        method: &'static str,
        reason: String,
    },
}

/// A read pass was discarded. No partial snapshot is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("failed to read record count")]
    Count(#[source] CallError),

    #[error("failed to read record {index} of {count}")]
    Record {
        index: u64,
        count: u64,
        #[source]
        source: CallError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no authorized account is available to sign the transaction")]
    Unauthorized,

    #[error("transaction was rejected by the user")]
    Rejected,

    #[error("transaction failed: {0}")]
    Failed(#[source] ProviderError),
}

impl SubmitError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, SubmitError::Rejected)
    }
}

impl From<ProviderError> for SubmitError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UserRejected => SubmitError::Rejected,
            ProviderError::Unauthorized(_) => SubmitError::Unauthorized,
            other => SubmitError::Failed(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no wallet provider detected")]
    NoProvider,

    #[error("ledger unavailable: {0}")]
    Unavailable(UnavailableReason),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("ledger operations are not available while the session is {0}")]
    NotReady(SessionPhase),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Interface(#[from] InterfaceError),
}
