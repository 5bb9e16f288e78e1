use super::commands::{IdentityArgs, OutputFormat};
use super::utils::{connect, emit, open_cache, FAIL, OK};
use docverify::config::{ClientConfig, WALLET_KEY_ENV};
use docverify::{fingerprint_file, verification_link, DocumentRecord, DocverifyError, DocverifyResult, ReceiptHandle};
use serde::Serialize;
use std::path::Path;
use tracing::{error, warn};

#[derive(Serialize)]
struct AddReport<'a> {
    label: &'a str,
    receipt: &'a ReceiptHandle,
    link: Option<String>,
}

pub async fn handle_add(
    config: &ClientConfig,
    file: &Path,
    identity: IdentityArgs,
    label: Option<String>,
    format: &OutputFormat,
) -> DocverifyResult<()> {
    let fingerprint = fingerprint_file(file)?;
    let record = DocumentRecord::from(identity);
    let label = label.unwrap_or_else(|| {
        file.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| fingerprint.short())
    });

    let (agent, client) = connect(config)?;
    if agent.address().is_none() {
        println!("{} No signing key configured. Set {} to register documents.", FAIL, WALLET_KEY_ENV);
        return Err(DocverifyError::RejectedByRegistry("no signer configured for write".into()));
    }

    if matches!(format, OutputFormat::Text) {
        println!("Registering {} ({})...", label, fingerprint.short());
    }

    let receipt = match client.add(&fingerprint, &record).await {
        Ok(receipt) => receipt,
        Err(e) => {
            error!("Registration failed: {}", e);
            println!("{} {}", FAIL, e);
            return Err(e);
        }
    };

    if let Some(cache) = open_cache(config) {
        if let Err(e) = cache.record_success(fingerprint, label.clone()) {
            warn!("Could not update recent activity: {}", e);
        }
    }

    let link = match verification_link(&config.links.base_url, &fingerprint) {
        Ok(link) => Some(link.to_string()),
        Err(e) => {
            warn!("No verification link: {}", e);
            None
        }
    };

    let report = AddReport {
        label: &label,
        receipt: &receipt,
        link,
    };

    emit(format, &report, |r| {
        println!("{} Document registered", OK);
        println!("Fingerprint: \x1b[38;5;51m{}\x1b[0m", r.receipt.fingerprint);
        println!("Transaction: \x1b[38;5;245m{}\x1b[0m", r.receipt.transaction_hash);
        if let Some(block) = r.receipt.block_number {
            println!("Block:       {}", block);
        }
        if let Some(link) = &r.link {
            println!("Verify at:   {}", link);
        }
    })
}
