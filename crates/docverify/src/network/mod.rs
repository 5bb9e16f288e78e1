mod agent;
mod chains;
#[cfg(any(test, feature = "test-util"))]
mod mock;
mod rpc_agent;
mod selector;

pub use agent::{AgentError, ChainParams, SigningAgent};
pub use chains::{
    ChainPreset, LOCAL_CHAIN_ID, LOCAL_CHAIN_NAME, LOCAL_REGISTRY_ADDRESS, LOCAL_RPC_URL,
    SEPOLIA_CHAIN_ID, SEPOLIA_CHAIN_NAME, SEPOLIA_RPC_ENDPOINTS,
};
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockAgent, MockBehavior};
pub use rpc_agent::{RpcAgent, SignerClient};
pub use selector::{NetworkSelector, DEFAULT_QUERY_TIMEOUT};
