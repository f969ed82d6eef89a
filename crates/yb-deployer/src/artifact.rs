//! Compiled contract artifacts.

use std::path::Path;

use alloy_primitives::{hex, Bytes};
use serde::Deserialize;

use crate::{ContractFactory, DeployError, Result};

/// Creation bytecode as emitted by either Hardhat or Foundry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Hardhat: `"bytecode": "0x..."`
    Hex(String),
    /// Foundry: `"bytecode": { "object": "0x...", ... }`
    Object { object: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    bytecode: ArtifactBytecode,
}

/// A compiled contract ready to be deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// Contract name, when the artifact records it
    pub name: Option<String>,
    /// Creation bytecode without constructor arguments
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parses an artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| DeployError::config(format!("malformed contract artifact: {e}")))?;
        let code = match &raw.bytecode {
            ArtifactBytecode::Hex(code) | ArtifactBytecode::Object { object: code } => code,
        };
        if code.contains("__$") {
            return Err(DeployError::config("artifact bytecode has unlinked library placeholders"));
        }
        let bytecode = hex::decode(code.trim())
            .map_err(|e| DeployError::config(format!("artifact bytecode is not valid hex: {e}")))?;
        if bytecode.is_empty() {
            return Err(DeployError::config("artifact bytecode is empty (abstract contract?)"));
        }
        Ok(Self { name: raw.contract_name, bytecode: bytecode.into() })
    }

    /// Reads and parses the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DeployError::config(format!("failed to read artifact '{}': {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// A factory deploying this artifact.
    pub fn factory(&self) -> Result<ContractFactory> {
        ContractFactory::new(self.bytecode.clone())
    }
}
