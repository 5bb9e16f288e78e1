use super::agent::{AgentError, ChainParams, SigningAgent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MockBehavior {
    #[default]
    Cooperative,
    RejectSwitch,
    FailSwitch,
    Unreachable,
    /// Chain queries never answer, like an endpoint that accepts the
    /// connection and then goes silent.
    Stall,
}

#[derive(Default)]
struct MockState {
    current: u64,
    behavior: MockBehavior,
    known: HashMap<u64, ChainParams>,
    switch_calls: u32,
    add_calls: u32,
}

/// In-process agent for exercising the selector and registry client without
/// a live node.
pub struct MockAgent {
    state: Mutex<MockState>,
    switch_latency: Duration,
    can_sign: bool,
}

impl MockAgent {
    pub fn on_chain(chain_id: u64) -> Self {
        Self {
            state: Mutex::new(MockState {
                current: chain_id,
                ..Default::default()
            }),
            switch_latency: Duration::ZERO,
            can_sign: true,
        }
    }

    pub fn attached_to(params: &ChainParams) -> Self {
        let agent = Self::on_chain(params.chain_id);
        agent.state.lock().known.insert(params.chain_id, params.clone());
        agent
    }

    pub fn knowing(self, params: &ChainParams) -> Self {
        self.state.lock().known.insert(params.chain_id, params.clone());
        self
    }

    pub fn with_behavior(self, behavior: MockBehavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        self.state.lock().behavior = behavior;
    }

    pub fn with_switch_latency(mut self, latency: Duration) -> Self {
        self.switch_latency = latency;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.can_sign = false;
        self
    }

    pub fn current_chain(&self) -> u64 {
        self.state.lock().current
    }

    pub fn switch_calls(&self) -> u32 {
        self.state.lock().switch_calls
    }

    pub fn add_calls(&self) -> u32 {
        self.state.lock().add_calls
    }
}

#[async_trait]
impl SigningAgent for MockAgent {
    async fn chain_id(&self) -> Result<u64, AgentError> {
        let (behavior, current) = {
            let state = self.state.lock();
            (state.behavior, state.current)
        };
        match behavior {
            MockBehavior::Unreachable => Err(AgentError::Failed("agent unreachable".into())),
            MockBehavior::Stall => std::future::pending().await,
            _ => Ok(current),
        }
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), AgentError> {
        let behavior = {
            let mut state = self.state.lock();
            state.switch_calls += 1;
            state.behavior
        };
        if !self.switch_latency.is_zero() {
            tokio::time::sleep(self.switch_latency).await;
        }

        match behavior {
            MockBehavior::RejectSwitch => return Err(AgentError::Rejected("user declined".into())),
            MockBehavior::FailSwitch => return Err(AgentError::Failed("wallet internal error".into())),
            _ => {}
        }

        let mut state = self.state.lock();
        if !state.known.contains_key(&chain_id) {
            return Err(AgentError::UnknownChain(chain_id));
        }
        state.current = chain_id;
        Ok(())
    }

    async fn add_chain(&self, params: &ChainParams) -> Result<(), AgentError> {
        let mut state = self.state.lock();
        state.add_calls += 1;
        state.known.insert(params.chain_id, params.clone());
        Ok(())
    }

    fn can_sign(&self) -> bool {
        self.can_sign
    }
}
