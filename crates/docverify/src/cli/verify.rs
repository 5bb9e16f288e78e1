use super::commands::OutputFormat;
use super::utils::{connect, emit, print_outcome, OK, WARN};
use docverify::config::ClientConfig;
use docverify::{
    fingerprint_file, fingerprint_from_link, BatchJob, BatchReport, BatchStatus, BatchVerifier, CancellationToken,
    DocverifyResult,
};
use std::path::{Path, PathBuf};
use tracing::info;

pub async fn handle_verify(
    config: &ClientConfig,
    raw: Option<String>,
    file: Option<PathBuf>,
    link: Option<String>,
    format: &OutputFormat,
) -> DocverifyResult<()> {
    let (_agent, client) = connect(config)?;

    let outcome = if let Some(path) = file {
        let fingerprint = fingerprint_file(&path)?;
        client.check(&path.display().to_string(), fingerprint).await
    } else if let Some(link) = link {
        let fingerprint = fingerprint_from_link(&link)?;
        client.check(&link, fingerprint).await
    } else {
        client.check_raw(raw.as_deref().unwrap_or_default()).await
    };

    emit(format, &outcome, print_outcome)
}

pub async fn handle_batch(
    config: &ClientConfig,
    manual: Option<String>,
    sheet: Option<PathBuf>,
    concurrency: Option<usize>,
    format: &OutputFormat,
) -> DocverifyResult<()> {
    let job = match (manual, sheet) {
        (_, Some(path)) => load_sheet(&path)?,
        (Some(text), None) => BatchJob::from_manual(&text),
        (None, None) => BatchJob::from_manual(""),
    };

    let (_agent, client) = connect(config)?;
    let verifier = BatchVerifier::new(client, concurrency.unwrap_or(config.batch.concurrency));

    let (handle, token) = CancellationToken::new();
    let interrupt = handle.cancel_on_ctrl_c();
    let report = verifier.run_batch(job, token).await;
    interrupt.abort();

    emit(format, &report, print_report)
}

fn load_sheet(path: &Path) -> DocverifyResult<BatchJob> {
    let job = BatchJob::from_spreadsheet(path)?;
    info!("Batch {} loaded {} entries from {}", job.id, job.len(), path.display());
    Ok(job)
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        print_outcome(outcome);
    }

    println!("\x1b[38;5;245m{}\x1b[0m", "═".repeat(50));
    let marker = match report.status {
        BatchStatus::AllValid => OK,
        BatchStatus::SomeInvalid => WARN,
    };
    println!(
        "{} {}: {} valid, {} invalid, {} errors of {} ({} ms)",
        marker,
        report.status,
        report.valid,
        report.invalid,
        report.errors,
        report.total(),
        report.elapsed_ms
    );
    if report.cancelled {
        println!("{} Batch was interrupted; remaining entries were not checked", WARN);
    }
}
