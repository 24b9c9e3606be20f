//! Deployment manifest — which contract lives at which address.
//!
//! ```json
//! {
//!   "chainId": 31337,
//!   "contracts": {
//!     "CLOB": { "address": "0x..." },
//!     "BTC":  { "address": "0x..." },
//!     "USDC": { "address": "0x..." }
//!   }
//! }
//! ```

use crate::error::ClientError;
use crate::shared::Token;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Manifest key of the order-book contract.
pub const CLOB_CONTRACT: &str = "CLOB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub address: Address,
    /// Block the contract was deployed at; a useful first block for log polling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_on_block: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub chain_id: u64,
    pub contracts: BTreeMap<String, ContractInfo>,
}

impl Deployment {
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Other(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn contract(&self, name: &str) -> Result<&ContractInfo, ClientError> {
        self.contracts.get(name).ok_or_else(|| {
            ClientError::Validation(format!(
                "Contract {} missing from deployment for chain {}",
                name, self.chain_id
            ))
        })
    }

    pub fn clob_address(&self) -> Result<Address, ClientError> {
        Ok(self.contract(CLOB_CONTRACT)?.address)
    }

    pub fn token_address(&self, token: Token) -> Result<Address, ClientError> {
        Ok(self.contract(token.symbol())?.address)
    }

    /// Earliest known deployment block among the listed contracts.
    pub fn first_block(&self) -> Option<u64> {
        self.contracts
            .values()
            .filter_map(|c| c.deployed_on_block)
            .min()
    }
}
