use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainParams {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
}

impl ChainParams {
    pub fn new(chain_id: u64, chain_name: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            chain_id,
            chain_name: chain_name.into(),
            rpc_url: rpc_url.into(),
        }
    }

    pub fn hex_chain_id(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

impl fmt::Display for ChainParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.chain_name, self.chain_id, self.rpc_url)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("chain {0} is not known to the agent")]
    UnknownChain(u64),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Failed(String),
}

/// The wallet-like capability that holds the ledger connection. It is passed
/// in explicitly wherever it is needed and never looked up from global state.
#[async_trait]
pub trait SigningAgent: Send + Sync {
    async fn chain_id(&self) -> Result<u64, AgentError>;

    async fn switch_chain(&self, chain_id: u64) -> Result<(), AgentError>;

    async fn add_chain(&self, params: &ChainParams) -> Result<(), AgentError>;

    fn can_sign(&self) -> bool;
}
