use super::agent::{AgentError, ChainParams, SigningAgent};
use async_trait::async_trait;
use docverify_types::{DocverifyError, DocverifyResult};
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::Address,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Clone)]
struct ActiveChain {
    params: ChainParams,
    provider: Arc<Provider<Http>>,
}

/// JSON-RPC backed agent. It starts attached to one endpoint and can be
/// moved to any chain it has been told about, like a browser wallet.
pub struct RpcAgent {
    chains: RwLock<HashMap<u64, ChainParams>>,
    active: RwLock<ActiveChain>,
    wallet: Option<LocalWallet>,
    allow_switch: bool,
    poll_interval: Duration,
}

impl RpcAgent {
    pub fn new(initial: ChainParams, wallet: Option<LocalWallet>, allow_switch: bool, poll_interval: Duration) -> DocverifyResult<Self> {
        let provider = Self::build_provider(&initial.rpc_url, poll_interval)
            .map_err(|e| DocverifyError::Config(e.to_string()))?;

        let mut chains = HashMap::new();
        chains.insert(initial.chain_id, initial.clone());

        info!("Signing agent attached to {}", initial);

        Ok(Self {
            chains: RwLock::new(chains),
            active: RwLock::new(ActiveChain {
                params: initial,
                provider: Arc::new(provider),
            }),
            wallet,
            allow_switch,
            poll_interval,
        })
    }

    pub fn parse_wallet(private_key: &str) -> DocverifyResult<LocalWallet> {
        private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| DocverifyError::Config(format!("Invalid private key: {}", e)))
    }

    fn build_provider(url: &str, poll_interval: Duration) -> Result<Provider<Http>, AgentError> {
        Provider::<Http>::try_from(url)
            .map(|p| p.interval(poll_interval))
            .map_err(|e| AgentError::Failed(format!("invalid RPC url {}: {}", url, e)))
    }

    pub fn active_chain(&self) -> ChainParams {
        self.active.read().params.clone()
    }

    pub fn address(&self) -> Option<Address> {
        self.wallet.as_ref().map(|w| w.address())
    }

    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.active.read().provider.clone()
    }

    pub fn signer(&self) -> DocverifyResult<Arc<SignerClient>> {
        let wallet = self
            .wallet
            .clone()
            .ok_or_else(|| DocverifyError::RejectedByRegistry("no signer configured for write".into()))?;

        let active = self.active.read().clone();
        let wallet = wallet.with_chain_id(active.params.chain_id);
        Ok(Arc::new(SignerMiddleware::new((*active.provider).clone(), wallet)))
    }
}

#[async_trait]
impl SigningAgent for RpcAgent {
    async fn chain_id(&self) -> Result<u64, AgentError> {
        let provider = self.provider();
        let id = provider
            .get_chainid()
            .await
            .map_err(|e| AgentError::Failed(format!("failed to get chain ID: {}", e)))?;
        Ok(id.as_u64())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), AgentError> {
        if !self.allow_switch {
            return Err(AgentError::Rejected("network switching is disabled".into()));
        }

        let params = self
            .chains
            .read()
            .get(&chain_id)
            .cloned()
            .ok_or(AgentError::UnknownChain(chain_id))?;

        let provider = Self::build_provider(&params.rpc_url, self.poll_interval)?;
        let reported = provider
            .get_chainid()
            .await
            .map_err(|e| AgentError::Failed(format!("{} unreachable: {}", params.rpc_url, e)))?
            .as_u64();

        if reported != chain_id {
            return Err(AgentError::Failed(format!(
                "Chain ID mismatch: expected {}, got {}",
                chain_id, reported
            )));
        }

        info!("Switched signing agent to {}", params);
        *self.active.write() = ActiveChain {
            params,
            provider: Arc::new(provider),
        };
        Ok(())
    }

    async fn add_chain(&self, params: &ChainParams) -> Result<(), AgentError> {
        if !self.allow_switch {
            return Err(AgentError::Rejected("adding networks is disabled".into()));
        }
        Self::build_provider(&params.rpc_url, self.poll_interval)?;

        debug!("Registering chain {}", params);
        self.chains.write().insert(params.chain_id, params.clone());
        Ok(())
    }

    fn can_sign(&self) -> bool {
        self.wallet.is_some()
    }
}
