use crate::error::InterfaceError;
use crate::wallet::{Address, NetworkId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUNDLED_ARTIFACT: &str = include_str!("../../contracts/MedicalRecords.json");

/// Compiled contract artifact: ABI plus the per-network deployment table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInterface {
    pub contract_name: String,
    #[serde(default)]
    pub schema_version: Option<String>,
    pub abi: Vec<AbiEntry>,
    /// Keyed by decimal network id.
    #[serde(default)]
    pub networks: HashMap<String, NetworkDeployment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default)]
    pub state_mutability: Option<StateMutability>,
    /// Pre-0.5 compilers mark read-only functions this way.
    #[serde(default)]
    pub constant: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    pub address: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl AbiEntry {
    pub fn is_function(&self) -> bool {
        self.kind == "function"
    }

    pub fn is_read_only(&self) -> bool {
        match self.state_mutability {
            Some(StateMutability::View | StateMutability::Pure) => true,
            Some(_) => false,
            None => self.constant.unwrap_or(false),
        }
    }

    fn mutability_label(&self) -> &'static str {
        if self.is_read_only() { "read-only" } else { "state-changing" }
    }
}

impl ContractInterface {
    pub fn from_json(json: &str) -> Result<Self, InterfaceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The artifact compiled into this crate.
    pub fn bundled() -> Result<Self, InterfaceError> {
        Self::from_json(BUNDLED_ARTIFACT)
    }

    pub fn load(path: &Path) -> Result<Self, InterfaceError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn address_for(&self, network_id: NetworkId) -> Option<Address> {
        self.networks
            .get(&network_id.to_string())
            .map(|deployment| Address::new(deployment.address.clone()))
    }

    pub fn function(&self, name: &str) -> Result<&AbiEntry, InterfaceError> {
        self.abi
            .iter()
            .find(|entry| entry.is_function() && entry.name.as_deref() == Some(name))
            .ok_or_else(|| InterfaceError::MissingFunction(name.to_string()))
    }

    pub fn ensure_view(&self, name: &str) -> Result<&AbiEntry, InterfaceError> {
        let entry = self.function(name)?;
        if !entry.is_read_only() {
            return Err(InterfaceError::WrongMutability {
                name: name.to_string(),
                expected: "read-only",
                actual: entry.mutability_label(),
            });
        }
        Ok(entry)
    }

    pub fn ensure_mutating(&self, name: &str) -> Result<&AbiEntry, InterfaceError> {
        let entry = self.function(name)?;
        if entry.is_read_only() {
            return Err(InterfaceError::WrongMutability {
                name: name.to_string(),
                expected: "state-changing",
                actual: entry.mutability_label(),
            });
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_artifact_describes_medical_records() {
        let interface = ContractInterface::bundled().unwrap();

        assert_eq!(interface.contract_name, "MedicalRecords");
        assert!(interface.ensure_view("recordCount").is_ok());
        assert_eq!(interface.ensure_view("records").unwrap().outputs.len(), 3);
        assert_eq!(interface.ensure_mutating("addRecord").unwrap().inputs.len(), 2);
    }

    #[test]
    fn resolves_only_deployed_networks() {
        let interface = ContractInterface::bundled().unwrap();

        assert_eq!(
            interface.address_for(5777),
            Some(Address::from("0x5fbdb2315678afecb367f032d93f642f64180aa3"))
        );
        for network_id in [1, 5, 11155111, 0] {
            assert_eq!(interface.address_for(network_id), None);
        }
    }

    #[test]
    fn events_are_not_callable_functions() {
        let interface = ContractInterface::bundled().unwrap();
        assert!(matches!(
            interface.function("RecordAdded"),
            Err(InterfaceError::MissingFunction(_))
        ));
    }

    #[test]
    fn mutability_mismatch_is_reported() {
        let interface = ContractInterface::bundled().unwrap();
        assert!(matches!(
            interface.ensure_view("addRecord"),
            Err(InterfaceError::WrongMutability { .. })
        ));
        assert!(interface.ensure_mutating("records").is_err());
    }

    #[test]
    fn legacy_constant_flag_marks_read_only() {
        let json = r#"{
            "contractName": "Legacy",
            "abi": [{"type": "function", "name": "recordCount", "constant": true}]
        }"#;
        let interface = ContractInterface::from_json(json).unwrap();
        assert!(interface.ensure_view("recordCount").is_ok());
        assert!(interface.networks.is_empty());
    }

    #[test]
    fn malformed_artifact_is_an_error() {
        assert!(matches!(
            ContractInterface::from_json("{\"abi\": 3}"),
            Err(InterfaceError::Json(_))
        ));
    }
}
