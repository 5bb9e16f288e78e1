mod client;
mod sections;
mod types;

pub use client::{default_data_dir, ClientConfig, CONFIG_FILE_NAME, WALLET_KEY_ENV};
pub use sections::{
    BatchConfig, CacheConfig, LinksConfig, LoggingConfig, NetworkConfig, RegistryConfig, ValidationConfig,
};
pub use types::LogLevel;
