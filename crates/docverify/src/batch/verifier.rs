use super::job::{BatchEntry, BatchJob};
use crate::cancellation::CancellationToken;
use crate::registry::RegistryClient;
use docverify_types::{BatchStatus, VerificationOutcome, VerificationStatus};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const MAX_CONCURRENCY: usize = 8;

pub const CANCELLED_MESSAGE: &str = "cancelled";

#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    pub job_id: Uuid,
    pub outcomes: Vec<VerificationOutcome>,
    pub status: BatchStatus,
    pub valid: usize,
    pub invalid: usize,
    pub errors: usize,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

impl BatchReport {
    fn new(job_id: Uuid, outcomes: Vec<VerificationOutcome>, cancelled: bool, elapsed_ms: u64) -> Self {
        let count = |status| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            job_id,
            status: BatchStatus::from_outcomes(&outcomes),
            valid: count(VerificationStatus::Valid),
            invalid: count(VerificationStatus::Invalid),
            errors: count(VerificationStatus::Error),
            cancelled,
            elapsed_ms,
            outcomes,
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Verifies every entry of a job through one [`RegistryClient`]. A failing
/// entry only affects its own outcome; output order always matches input
/// order.
pub struct BatchVerifier {
    client: Arc<RegistryClient>,
    concurrency: usize,
}

impl BatchVerifier {
    pub fn new(client: Arc<RegistryClient>, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run_batch(&self, job: BatchJob, cancel: CancellationToken) -> BatchReport {
        let span = info_span!("batch", job = %job.id, source = %job.source);
        self.run(job, cancel).instrument(span).await
    }

    async fn run(&self, job: BatchJob, cancel: CancellationToken) -> BatchReport {
        let started = Instant::now();
        let total = job.entries.len();
        let skipped = AtomicUsize::new(0);
        info!("Verifying {} entries, {} at a time", total, self.concurrency);

        let outcomes: Vec<VerificationOutcome> = stream::iter(job.entries.into_iter().enumerate())
            .map(|(index, entry)| {
                let cancel = &cancel;
                let skipped = &skipped;
                async move {
                    if cancel.is_cancelled() {
                        skipped.fetch_add(1, Ordering::Relaxed);
                        return VerificationOutcome::error(entry.raw, None, CANCELLED_MESSAGE).with_label(entry.label);
                    }
                    self.verify_entry(index, entry).await
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let skipped = skipped.load(Ordering::Relaxed);
        let report = BatchReport::new(job.id, outcomes, skipped > 0, started.elapsed().as_millis() as u64);

        info!(
            "Batch finished: {} ({} valid, {} invalid, {} errors{})",
            report.status,
            report.valid,
            report.invalid,
            report.errors,
            if report.cancelled {
                format!(", {} cancelled", skipped)
            } else {
                String::new()
            }
        );
        report
    }

    async fn verify_entry(&self, index: usize, entry: BatchEntry) -> VerificationOutcome {
        let outcome = self.client.check_raw(&entry.raw).await.with_label(entry.label);
        debug!("Entry {}: {} ({})", index, outcome.status, outcome.message);
        outcome
    }
}
