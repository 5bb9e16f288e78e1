use super::agent::ChainParams;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const LOCAL_CHAIN_ID: u64 = 31337;
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
pub const LOCAL_CHAIN_NAME: &str = "Hardhat Localhost";

pub const SEPOLIA_CHAIN_ID: u64 = 11155111;
pub const SEPOLIA_CHAIN_NAME: &str = "Sepolia Testnet";

pub const SEPOLIA_RPC_ENDPOINTS: &[&str] = &[
    "https://ethereum-sepolia-rpc.publicnode.com",
    "https://rpc.sepolia.org",
    "https://sepolia.drpc.org",
];

/// Address the registry contract gets on a fresh local dev chain.
pub const LOCAL_REGISTRY_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChainPreset {
    #[default]
    Local,
    Sepolia,
    Custom,
}

impl ChainPreset {
    pub fn params(&self) -> Option<ChainParams> {
        match self {
            ChainPreset::Local => Some(ChainParams::new(LOCAL_CHAIN_ID, LOCAL_CHAIN_NAME, LOCAL_RPC_URL)),
            ChainPreset::Sepolia => Some(ChainParams::new(
                SEPOLIA_CHAIN_ID,
                SEPOLIA_CHAIN_NAME,
                SEPOLIA_RPC_ENDPOINTS[0],
            )),
            ChainPreset::Custom => None,
        }
    }
}

impl fmt::Display for ChainPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainPreset::Local => write!(f, "local"),
            ChainPreset::Sepolia => write!(f, "sepolia"),
            ChainPreset::Custom => write!(f, "custom"),
        }
    }
}
