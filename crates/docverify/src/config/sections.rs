use crate::batch::DEFAULT_CONCURRENCY;
use crate::link::DEFAULT_LINK_BASE;
use crate::network::{ChainParams, ChainPreset, LOCAL_REGISTRY_ADDRESS};
use crate::registry::RetryPolicy;
use crate::validation::ValidationPolicy;
use docverify_types::{DocverifyError, DocverifyResult, RECENT_ACTIVITY_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::LogLevel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub preset: ChainPreset,
    pub chain_id: Option<u64>,
    pub chain_name: Option<String>,
    pub rpc_url: Option<String>,
    pub registry_address: String,
    pub allow_switch: bool,
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            preset: ChainPreset::Local,
            chain_id: None,
            chain_name: None,
            rpc_url: None,
            registry_address: LOCAL_REGISTRY_ADDRESS.to_string(),
            allow_switch: true,
            poll_interval_ms: 500,
        }
    }
}

impl NetworkConfig {
    /// The chain the registry lives on: the preset, with any explicit
    /// `chain_id`/`chain_name`/`rpc_url` taking precedence.
    pub fn chain_params(&self) -> DocverifyResult<ChainParams> {
        let base = self.preset.params();

        let chain_id = self
            .chain_id
            .or(base.as_ref().map(|p| p.chain_id))
            .ok_or_else(|| DocverifyError::Config("network.chain_id is required for the custom preset".into()))?;

        let rpc_url = self
            .rpc_url
            .clone()
            .or(base.as_ref().map(|p| p.rpc_url.clone()))
            .ok_or_else(|| DocverifyError::Config("network.rpc_url is required for the custom preset".into()))?;

        let chain_name = self
            .chain_name
            .clone()
            .or(base.map(|p| p.chain_name))
            .unwrap_or_else(|| format!("Chain {}", chain_id));

        Ok(ChainParams::new(chain_id, chain_name, rpc_url))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub call_timeout_secs: u64,
    pub confirm_timeout_secs: u64,
    pub confirmations: usize,
    pub max_retries: u32,
    pub write_retries: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            call_timeout_secs: 30,
            confirm_timeout_secs: 120,
            confirmations: 1,
            max_retries: retry.read_retries,
            write_retries: retry.write_retries,
            base_backoff_ms: retry.base_delay_ms,
            max_backoff_ms: retry.max_delay_ms,
        }
    }
}

impl RegistryConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            read_retries: self.max_retries,
            write_retries: self.write_retries,
            base_delay_ms: self.base_backoff_ms,
            max_delay_ms: self.max_backoff_ms,
            jitter: true,
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: RECENT_ACTIVITY_CAPACITY,
            path: None,
        }
    }
}

impl CacheConfig {
    pub fn resolve_path(&self, data_dir: &Path) -> PathBuf {
        self.path.clone().unwrap_or_else(|| data_dir.join("recent"))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub require_core_fields: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_core_fields: true,
        }
    }
}

impl ValidationConfig {
    pub fn policy(&self) -> ValidationPolicy {
        if self.require_core_fields {
            ValidationPolicy::RequireCore
        } else {
            ValidationPolicy::FormatOnly
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub base_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LINK_BASE.to_string(),
        }
    }
}
