use super::commands::{Cli, OutputFormat};
use docverify::config::{ClientConfig, LoggingConfig, WALLET_KEY_ENV};
use docverify::network::{NetworkSelector, RpcAgent};
use docverify::registry::{ContractRegistry, RegistryClient};
use docverify::{DocverifyError, DocverifyResult, RecordCache, VerificationOutcome, VerificationStatus};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const OK: &str = "\x1b[38;5;46m[+]\x1b[0m";
pub const FAIL: &str = "\x1b[38;5;196m[-]\x1b[0m";
pub const WARN: &str = "\x1b[38;5;226m[!]\x1b[0m";

pub fn init_logging(cli: &Cli, logging: &LoggingConfig) {
    let configured = logging.level.as_filter().to_string();
    let level = if cli.quiet {
        "warn".to_string()
    } else {
        match cli.verbose {
            0 => configured,
            1 => "info,docverify=debug".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let log_file = cli.log_file.as_ref().or(logging.file.as_ref());
    let (writer, ansi) = match log_file.map(open_log_file) {
        Some(Ok(file)) => (BoxMakeWriter::new(std::sync::Mutex::new(file)), false),
        Some(Err(e)) => {
            eprintln!("{} Cannot open log file: {}", WARN, e);
            (BoxMakeWriter::new(std::io::stderr), true)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter);

    if logging.json {
        subscriber.with(fmt::layer().json().with_writer(writer)).init();
    } else {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(cli.verbose >= 2);
        subscriber.with(layer).init();
    }
}

fn open_log_file(path: &PathBuf) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(|| {
        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(docverify::config::default_data_dir);
        ClientConfig::default_path(&data_dir)
    })
}

/// An explicit `--data-dir` wins over the file's `data_dir`.
pub fn load_config(cli: &Cli, path: &Path) -> DocverifyResult<ClientConfig> {
    let mut config = ClientConfig::load(path)?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

/// Wires the RPC agent, contract registry and network selector together
/// from configuration. The signing key is read from the environment only.
pub fn connect(config: &ClientConfig) -> DocverifyResult<(Arc<RpcAgent>, Arc<RegistryClient>)> {
    let expected = config.network.chain_params()?;

    let wallet = std::env::var(WALLET_KEY_ENV)
        .ok()
        .map(|key| RpcAgent::parse_wallet(&key))
        .transpose()?;

    let agent = Arc::new(RpcAgent::new(
        expected.clone(),
        wallet,
        config.network.allow_switch,
        config.network.poll_interval(),
    )?);

    if let Some(address) = agent.address() {
        info!("Signing as {:?}", address);
    }

    let registry_address = ContractRegistry::parse_address(&config.network.registry_address)?;
    let registry = Arc::new(ContractRegistry::new(
        agent.clone(),
        registry_address,
        config.registry.confirmations,
    ));
    let selector = Arc::new(
        NetworkSelector::new(Some(agent.clone()), expected).with_query_timeout(config.registry.call_timeout()),
    );

    let client = RegistryClient::new(registry, selector)
        .with_retry_policy(config.registry.retry_policy())
        .with_timeouts(config.registry.call_timeout(), config.registry.confirm_timeout())
        .with_validation(config.validation.policy());

    Ok((agent, Arc::new(client)))
}

pub fn open_cache(config: &ClientConfig) -> Option<RecordCache> {
    match RecordCache::open_or_ephemeral(config.cache_path(), config.cache.capacity) {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!("Recent activity unavailable: {}", e);
            None
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> DocverifyResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| DocverifyError::Serialization(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

pub fn print_outcome(outcome: &VerificationOutcome) {
    let marker = match outcome.status {
        VerificationStatus::Valid => OK,
        VerificationStatus::Invalid => FAIL,
        VerificationStatus::Error => WARN,
    };
    let subject = match (&outcome.label, &outcome.fingerprint) {
        (Some(label), Some(fp)) => format!("{} ({})", label, fp.short()),
        (Some(label), None) => format!("{} ({})", label, display_input(&outcome.input)),
        (None, Some(fp)) => fp.to_hex(),
        (None, None) => display_input(&outcome.input),
    };

    println!("{} {}  \x1b[38;5;245m{}\x1b[0m", marker, subject, outcome.message);

    if let Some(record) = &outcome.record {
        for (name, value) in record.fields() {
            if !value.is_empty() {
                println!("    {:<16} {}", name, value);
            }
        }
    }
}

fn display_input(input: &str) -> String {
    if input.is_empty() {
        "<empty>".to_string()
    } else {
        input.to_string()
    }
}

pub fn emit<T: Serialize>(format: &OutputFormat, value: &T, text: impl FnOnce(&T)) -> DocverifyResult<()> {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Text => {
            text(value);
            Ok(())
        }
    }
}
