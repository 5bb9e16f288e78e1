use docverify_types::{DocverifyError, DocverifyResult};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use url::Url;

use super::sections::{
    BatchConfig, CacheConfig, LinksConfig, LoggingConfig, NetworkConfig, RegistryConfig, ValidationConfig,
};
use crate::batch::MAX_CONCURRENCY;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const WALLET_KEY_ENV: &str = "DOCVERIFY_WALLET_KEY";

pub fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".docverify")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub network: NetworkConfig,
    pub registry: RegistryConfig,
    pub batch: BatchConfig,
    pub cache: CacheConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
    pub links: LinksConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            network: NetworkConfig::default(),
            registry: RegistryConfig::default(),
            batch: BatchConfig::default(),
            cache: CacheConfig::default(),
            validation: ValidationConfig::default(),
            logging: LoggingConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn load(path: impl AsRef<Path>) -> DocverifyResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| DocverifyError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| DocverifyError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> DocverifyResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| DocverifyError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DocverifyError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| DocverifyError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("DOCVERIFY_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(rpc) = lookup("DOCVERIFY_RPC_URL") {
            self.network.rpc_url = Some(rpc);
        }

        if let Some(id) = lookup("DOCVERIFY_CHAIN_ID") {
            match parse_chain_id(&id) {
                Some(id) => self.network.chain_id = Some(id),
                None => warn!("Ignoring DOCVERIFY_CHAIN_ID={}: not a chain id", id),
            }
        }

        if let Some(address) = lookup("DOCVERIFY_REGISTRY_ADDRESS") {
            self.network.registry_address = address;
        }

        if let Some(level) = lookup("DOCVERIFY_LOG_LEVEL") {
            match level.parse() {
                Ok(level) => self.logging.level = level,
                Err(e) => warn!("Ignoring DOCVERIFY_LOG_LEVEL: {}", e),
            }
        }

        if lookup("DOCVERIFY_LOG_JSON").is_some() {
            self.logging.json = true;
        }
    }

    pub fn validate(&self) -> DocverifyResult<()> {
        let chain = self.network.chain_params()?;

        let rpc = Url::parse(&chain.rpc_url)
            .map_err(|e| DocverifyError::Config(format!("Invalid RPC url {}: {}", chain.rpc_url, e)))?;
        if !matches!(rpc.scheme(), "http" | "https") {
            return Err(DocverifyError::Config(format!(
                "RPC url must be http or https, got {}",
                rpc.scheme()
            )));
        }

        self.network
            .registry_address
            .trim()
            .parse::<Address>()
            .map_err(|e| {
                DocverifyError::Config(format!(
                    "Invalid registry address {}: {}",
                    self.network.registry_address, e
                ))
            })?;

        if self.network.poll_interval_ms == 0 {
            return Err(DocverifyError::Config("Poll interval must be greater than 0".into()));
        }

        if self.registry.call_timeout_secs == 0 || self.registry.confirm_timeout_secs == 0 {
            return Err(DocverifyError::Config("Registry timeouts must be greater than 0".into()));
        }

        if self.registry.confirmations == 0 {
            return Err(DocverifyError::Config("At least one confirmation is required".into()));
        }

        if self.registry.base_backoff_ms > self.registry.max_backoff_ms {
            return Err(DocverifyError::Config(
                "base_backoff_ms cannot exceed max_backoff_ms".into(),
            ));
        }

        if self.registry.write_retries > 0 {
            warn!("write_retries > 0: a retried registration may be rejected as a duplicate");
        }

        if self.batch.concurrency == 0 || self.batch.concurrency > MAX_CONCURRENCY {
            warn!(
                "batch.concurrency {} will be clamped to 1..={}",
                self.batch.concurrency, MAX_CONCURRENCY
            );
        }

        if self.cache.capacity == 0 {
            return Err(DocverifyError::Config("Cache capacity must be at least 1".into()));
        }

        Url::parse(&self.links.base_url)
            .map_err(|e| DocverifyError::Config(format!("Invalid link base {}: {}", self.links.base_url, e)))?;

        Ok(())
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache.resolve_path(&self.data_dir)
    }
}

fn parse_chain_id(value: &str) -> Option<u64> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

impl std::fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "docverify configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f, "Data dir: {:?}", self.data_dir)?;
        match self.network.chain_params() {
            Ok(chain) => writeln!(f, "Network: {} [{}]", chain, self.network.preset)?,
            Err(e) => writeln!(f, "Network: {}", e)?,
        }
        writeln!(f, "Registry: {}", self.network.registry_address)?;
        writeln!(f, "Network switching: {}", if self.network.allow_switch { "ON" } else { "OFF" })?;
        writeln!(
            f,
            "Timeouts: {}s call, {}s confirm ({} confirmation(s))",
            self.registry.call_timeout_secs, self.registry.confirm_timeout_secs, self.registry.confirmations
        )?;
        writeln!(
            f,
            "Retries: {} read, {} write",
            self.registry.max_retries, self.registry.write_retries
        )?;
        writeln!(f, "Batch concurrency: {}", self.batch.concurrency)?;
        writeln!(f, "Recent activity: {} entries at {:?}", self.cache.capacity, self.cache_path())?;
        writeln!(f, "Validation policy: {:?}", self.validation.policy())?;
        writeln!(f, "Log level: {}", self.logging.level)?;
        writeln!(f, "Link base: {}", self.links.base_url)?;
        Ok(())
    }
}
