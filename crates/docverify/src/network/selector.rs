use super::agent::{AgentError, ChainParams, SigningAgent};
use docverify_types::{DocverifyError, DocverifyResult};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Makes sure the signing agent is on the expected chain before any registry
/// call. Concurrent callers queue on `negotiation`; whoever enters after a
/// switch finds the chain already correct and returns without switching.
/// Every agent call is bounded by `query_timeout`, so a stalled endpoint
/// releases the queue instead of holding it.
pub struct NetworkSelector {
    agent: Option<Arc<dyn SigningAgent>>,
    expected: ChainParams,
    negotiation: Mutex<()>,
    switches: AtomicU64,
    query_timeout: Duration,
}

impl NetworkSelector {
    pub fn new(agent: Option<Arc<dyn SigningAgent>>, expected: ChainParams) -> Self {
        Self {
            agent,
            expected,
            negotiation: Mutex::new(()),
            switches: AtomicU64::new(0),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn expected(&self) -> &ChainParams {
        &self.expected
    }

    pub fn agent(&self) -> Option<&Arc<dyn SigningAgent>> {
        self.agent.as_ref()
    }

    pub fn switch_count(&self) -> u64 {
        self.switches.load(Ordering::Relaxed)
    }

    pub async fn ensure_expected_network(&self) -> DocverifyResult<()> {
        let agent = self.agent.as_ref().ok_or(DocverifyError::UnsupportedAgent)?;
        let _guard = self.negotiation.lock().await;

        let current = self
            .bounded("chain id query", agent.chain_id())
            .await?
            .map_err(switch_error)?;
        if current == self.expected.chain_id {
            debug!("Agent already on chain {}", current);
            return Ok(());
        }

        info!(
            "Agent on chain {}, switching to {}",
            current, self.expected
        );

        match self.bounded("chain switch", agent.switch_chain(self.expected.chain_id)).await? {
            Ok(()) => {}
            Err(AgentError::UnknownChain(_)) => {
                info!("Chain {} unknown to agent, registering it", self.expected.hex_chain_id());
                self.bounded("chain registration", agent.add_chain(&self.expected))
                    .await?
                    .map_err(switch_error)?;
                self.bounded("chain switch", agent.switch_chain(self.expected.chain_id))
                    .await?
                    .map_err(switch_error)?;
            }
            Err(e) => return Err(switch_error(e)),
        }

        self.switches.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn bounded<T>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, AgentError>>,
    ) -> DocverifyResult<Result<T, AgentError>> {
        tokio::time::timeout(self.query_timeout, call).await.map_err(|_| {
            warn!("Agent {} timed out after {:?}", what, self.query_timeout);
            DocverifyError::SwitchFailed(format!("{} timed out after {:?}", what, self.query_timeout))
        })
    }
}

fn switch_error(e: AgentError) -> DocverifyError {
    match e {
        AgentError::Rejected(reason) => {
            warn!("Network switch rejected: {}", reason);
            DocverifyError::SwitchRejected(reason)
        }
        AgentError::UnknownChain(id) => {
            DocverifyError::SwitchFailed(format!("chain {} still unknown after registration", id))
        }
        AgentError::Failed(reason) => {
            warn!("Network switch failed: {}", reason);
            DocverifyError::SwitchFailed(reason)
        }
    }
}
