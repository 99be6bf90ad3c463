use crate::contract::ContractInterface;
use crate::error::ConfigError;
use crate::session::reader::DEFAULT_READ_WARN_THRESHOLD;
use crate::wallet::NetworkId;
use serde::Deserialize;
use std::path::PathBuf;

pub const ARTIFACT_VAR: &str = "MEDREC_ARTIFACT";
pub const READ_WARN_THRESHOLD_VAR: &str = "MEDREC_READ_WARN_THRESHOLD";
pub const LOG_VAR: &str = "MEDREC_LOG";
pub const DEV_NETWORK_ID_VAR: &str = "MEDREC_DEV_NETWORK_ID";

/// Network id of the deployment bundled with the crate (a local dev chain).
pub const DEFAULT_DEV_NETWORK_ID: NetworkId = 5777;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Contract artifact to load instead of the bundled one.
    pub artifact: Option<PathBuf>,
    pub read_warn_threshold: u64,
    pub log_filter: String,
    pub dev_network_id: NetworkId,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            artifact: None,
            read_warn_threshold: DEFAULT_READ_WARN_THRESHOLD,
            log_filter: "info".to_string(),
            dev_network_id: DEFAULT_DEV_NETWORK_ID,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset
    /// keys. Set but unparsable values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(ARTIFACT_VAR).filter(|value| !value.is_empty()) {
            config.artifact = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(READ_WARN_THRESHOLD_VAR) {
            config.read_warn_threshold = parse_u64(READ_WARN_THRESHOLD_VAR, value)?;
        }
        if let Some(filter) = lookup(LOG_VAR).filter(|value| !value.is_empty()) {
            config.log_filter = filter;
        }
        if let Some(value) = lookup(DEV_NETWORK_ID_VAR) {
            config.dev_network_id = parse_u64(DEV_NETWORK_ID_VAR, value)?;
        }

        Ok(config)
    }

    pub fn load_interface(&self) -> Result<ContractInterface, ConfigError> {
        let interface = match &self.artifact {
            Some(path) => ContractInterface::load(path)?,
            None => ContractInterface::bundled()?,
        };
        Ok(interface)
    }
}

fn parse_u64(key: &'static str, value: String) -> Result<u64, ConfigError> {
    let parsed = value.trim().parse::<u64>();
    parsed.map_err(|err| ConfigError::InvalidValue {
        key,
        reason: err.to_string(),
        value,
    })
}
