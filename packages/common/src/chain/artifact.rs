use std::path::Path;

use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;

use super::error::ChainError;

/// Compiled contract: ABI plus creation bytecode.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub abi: Abi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    // Hardhat
    Hex(Bytes),
    // Foundry
    Object { object: Bytes },
}

#[derive(Deserialize)]
struct RawArtifact {
    abi: Abi,
    bytecode: RawBytecode,
}

impl ContractArtifact {
    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        let raw: RawArtifact =
            serde_json::from_str(json).map_err(|e| ChainError::Artifact(e.to_string()))?;
        let bytecode = match raw.bytecode {
            RawBytecode::Hex(b) | RawBytecode::Object { object: b } => b,
        };
        if bytecode.is_empty() {
            return Err(ChainError::Artifact("bytecode is empty".into()));
        }
        if raw.abi.constructor.is_none() {
            return Err(ChainError::Artifact("ABI has no constructor".into()));
        }
        Ok(Self {
            abi: raw.abi,
            bytecode,
        })
    }

    pub async fn load(path: &Path) -> Result<Self, ChainError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ChainError::Artifact(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}
