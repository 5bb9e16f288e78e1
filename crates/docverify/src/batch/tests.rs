use super::job::render_cell;
use super::*;
use crate::cancellation::CancellationToken;
use crate::network::{ChainPreset, MockAgent, MockBehavior, NetworkSelector};
use crate::registry::{MemoryRegistry, RegistryClient, RetryPolicy};
use calamine::Data;
use docverify_crypto::fingerprint_bytes;
use docverify_types::{BatchStatus, DocumentRecord, Fingerprint, VerificationStatus};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn verifier(registry: Arc<MemoryRegistry>, concurrency: usize) -> BatchVerifier {
    let expected = ChainPreset::Local.params().unwrap();
    let agent = Arc::new(MockAgent::attached_to(&expected));
    let selector = Arc::new(NetworkSelector::new(Some(agent), expected));
    let client = RegistryClient::new(registry, selector).with_retry_policy(RetryPolicy::immediate(1));
    BatchVerifier::new(Arc::new(client), concurrency)
}

fn registered(registry: &MemoryRegistry, name: &str) -> Fingerprint {
    let fp = fingerprint_bytes(name.as_bytes());
    registry.seed(fp, DocumentRecord::with_name(name));
    fp
}

#[tokio::test]
async fn test_malformed_entry_keeps_order_and_skips_network() {
    let registry = Arc::new(MemoryRegistry::new());
    let first = registered(&registry, "alice");
    let second = registered(&registry, "bob");

    let job = BatchJob::from_manual(&format!("{}, not-a-hash\n{}", first, second));
    assert_eq!(job.len(), 3);

    let report = verifier(registry.clone(), 4).run_batch(job, CancellationToken::never()).await;

    let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![VerificationStatus::Valid, VerificationStatus::Error, VerificationStatus::Valid]
    );
    assert_eq!(report.outcomes[0].record.as_ref().unwrap().full_name, "alice");
    assert_eq!(report.outcomes[1].input, "not-a-hash");
    assert_eq!(report.outcomes[2].record.as_ref().unwrap().full_name, "bob");
    assert_eq!(report.status, BatchStatus::SomeInvalid);

    assert_eq!(registry.verify_calls(), 2);
    assert_eq!(registry.details_calls(), 2);
}

#[tokio::test]
async fn test_all_valid_aggregate() {
    let registry = Arc::new(MemoryRegistry::new());
    let a = registered(&registry, "a");
    let b = registered(&registry, "b");

    let job = BatchJob::from_manual(&format!("{} {}", a, b));
    let report = verifier(registry, 2).run_batch(job, CancellationToken::never()).await;

    assert_eq!(report.status, BatchStatus::AllValid);
    assert_eq!(report.status.to_string(), "All Valid");
    assert_eq!((report.valid, report.invalid, report.errors), (2, 0, 0));
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_empty_job_is_all_valid() {
    let registry = Arc::new(MemoryRegistry::new());
    let report = verifier(registry.clone(), 4)
        .run_batch(BatchJob::from_manual("  , \n"), CancellationToken::never())
        .await;

    assert_eq!(report.total(), 0);
    assert_eq!(report.status, BatchStatus::AllValid);
    assert_eq!(registry.total_calls(), 0);
}

#[tokio::test]
async fn test_unregistered_entry_is_invalid_without_details_call() {
    let registry = Arc::new(MemoryRegistry::new());
    let known = registered(&registry, "known");

    let job = BatchJob::from_manual(&format!("{} {}", known, Fingerprint::zero()));
    let report = verifier(registry.clone(), 4).run_batch(job, CancellationToken::never()).await;

    assert_eq!(report.outcomes[1].status, VerificationStatus::Invalid);
    assert_eq!(report.status.to_string(), "Some Invalid");
    assert_eq!(registry.verify_calls(), 2);
    assert_eq!(registry.details_calls(), 1);
}

#[tokio::test]
async fn test_registry_failure_is_isolated() {
    let registry = Arc::new(MemoryRegistry::new());
    let a = registered(&registry, "a");
    let b = registered(&registry, "b");
    registry.fail_next(2);

    let job = BatchJob::from_manual(&format!("{} {}", a, b));
    let report = verifier(registry.clone(), 1).run_batch(job, CancellationToken::never()).await;

    assert_eq!(report.outcomes[0].status, VerificationStatus::Error);
    assert!(report.outcomes[0].message.contains("Network failure"));
    assert_eq!(report.outcomes[1].status, VerificationStatus::Valid);
}

#[tokio::test]
async fn test_empty_hash_cell_is_labelled_error() {
    let registry = Arc::new(MemoryRegistry::new());
    let good = registered(&registry, "carol");
    let good_hex = good.to_hex();

    let rows = vec![
        vec!["Name", "Hash"],
        vec!["Alice", ""],
        vec!["Carol", good_hex.as_str()],
        vec!["Dave"],
    ];
    let job = BatchJob::from_rows(rows);
    assert_eq!(job.source, BatchSource::Spreadsheet);
    assert_eq!(job.len(), 3);

    let report = verifier(registry.clone(), 4).run_batch(job, CancellationToken::never()).await;

    assert_eq!(report.outcomes[0].label.as_deref(), Some("Alice"));
    assert_eq!(report.outcomes[0].status, VerificationStatus::Error);
    assert!(report.outcomes[0].fingerprint.is_none());
    assert_eq!(report.outcomes[1].status, VerificationStatus::Valid);
    assert_eq!(report.outcomes[2].label.as_deref(), Some("Dave"));
    assert_eq!(report.outcomes[2].status, VerificationStatus::Error);
    assert_eq!(registry.verify_calls(), 1);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let registry = Arc::new(MemoryRegistry::new());
    let a = registered(&registry, "a");
    let (handle, token) = CancellationToken::new();
    handle.cancel();

    let job = BatchJob::from_manual(&format!("{} {} {}", a, a, a));
    let report = verifier(registry.clone(), 4).run_batch(job, token).await;

    assert_eq!(report.total(), 3);
    assert!(report.cancelled);
    assert!(report.outcomes.iter().all(|o| o.message == CANCELLED_MESSAGE));
    assert_eq!(report.status, BatchStatus::SomeInvalid);
    assert_eq!(registry.total_calls(), 0);
}

#[tokio::test]
async fn test_cancel_mid_batch_finishes_in_flight() {
    let registry = Arc::new(MemoryRegistry::new().with_latency(Duration::from_millis(20)));
    let fp = registered(&registry, "slow");
    let raw: Vec<String> = (0..10).map(|_| fp.to_hex()).collect();
    let job = BatchJob::from_manual(&raw.join(" "));

    let (handle, token) = CancellationToken::new();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let report = verifier(registry, 1).run_batch(job, token).await;

    assert_eq!(report.total(), 10);
    assert!(report.cancelled);
    assert_eq!(report.outcomes[0].status, VerificationStatus::Valid);
    assert_eq!(report.outcomes[9].message, CANCELLED_MESSAGE);
    assert!(report.valid >= 1 && report.valid < 10);
}

#[tokio::test]
async fn test_concurrency_is_bounded_and_ordered() {
    let registry = Arc::new(MemoryRegistry::new().with_latency(Duration::from_millis(10)));
    let fps: Vec<_> = (0..12).map(|i| registered(&registry, &format!("doc-{}", i))).collect();
    let text = fps.iter().map(|fp| fp.to_hex()).collect::<Vec<_>>().join(",");

    let batch = verifier(registry.clone(), 3);
    let report = batch.run_batch(BatchJob::from_manual(&text), CancellationToken::never()).await;

    assert!(registry.peak_in_flight() <= 3);
    for (i, outcome) in report.outcomes.iter().enumerate() {
        assert_eq!(outcome.fingerprint, Some(fps[i]));
        assert_eq!(outcome.record.as_ref().unwrap().full_name, format!("doc-{}", i));
    }
}

#[test]
fn test_concurrency_clamped() {
    let registry = Arc::new(MemoryRegistry::new());
    assert_eq!(verifier(registry.clone(), 0).concurrency(), 1);
    assert_eq!(verifier(registry.clone(), 64).concurrency(), MAX_CONCURRENCY);
    assert_eq!(verifier(registry, DEFAULT_CONCURRENCY).concurrency(), 4);
}

#[test]
fn test_manual_split() {
    let job = BatchJob::from_manual("0xaa,0xbb  0xcc\n\t0xdd,,");
    let raws: Vec<_> = job.entries.iter().map(|e| e.raw.as_str()).collect();
    assert_eq!(raws, vec!["0xaa", "0xbb", "0xcc", "0xdd"]);
    assert!(job.entries.iter().all(|e| e.label.is_none()));
    assert_eq!(job.source, BatchSource::Manual);
}

#[test]
fn test_blank_rows_dropped() {
    let rows: Vec<Vec<String>> = vec![
        vec!["Name".into(), "Hash".into()],
        vec!["".into(), "".into()],
        vec!["Eve".into(), "0x01".into()],
    ];
    let job = BatchJob::from_rows(rows);
    assert_eq!(job.len(), 1);
    assert_eq!(job.entries[0], BatchEntry::labelled("Eve", "0x01"));
}

#[test]
fn test_csv_import() {
    let fp = fingerprint_bytes(b"csv");
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Name,Hash").unwrap();
    writeln!(file, "Frank, {}", fp).unwrap();
    writeln!(file, "Grace,").unwrap();
    writeln!(file, "Heidi").unwrap();
    file.flush().unwrap();

    let job = BatchJob::from_spreadsheet(file.path()).unwrap();
    assert_eq!(job.len(), 3);
    assert_eq!(job.entries[0].label.as_deref(), Some("Frank"));
    assert_eq!(job.entries[0].raw, fp.to_hex());
    assert_eq!(job.entries[1].raw, "");
    assert_eq!(job.entries[2].raw, "");
}

#[tokio::test]
async fn test_xlsx_import_runs_through_batch() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/certificates.xlsx");
    let job = BatchJob::from_spreadsheet(path).unwrap();

    assert_eq!(job.source, BatchSource::Spreadsheet);
    let labels: Vec<_> = job.entries.iter().map(|e| e.label.as_deref()).collect();
    assert_eq!(labels, vec![Some("Ivan"), Some("Judy"), Some("Mallory"), Some("Peggy")]);
    assert_eq!(job.entries[1].raw, "255");
    assert_eq!(job.entries[2].raw, "");
    assert_eq!(job.entries[3].raw, "4096");

    let registry = Arc::new(MemoryRegistry::new());
    let ivan = registered(&registry, "ivan");
    assert_eq!(job.entries[0].raw, ivan.to_hex());
    let judy = Fingerprint::from_bytes({
        let mut bytes = [0u8; 32];
        bytes[31] = 0xff;
        bytes
    });
    registry.seed(judy, DocumentRecord::with_name("judy"));

    let report = verifier(registry.clone(), 4).run_batch(job, CancellationToken::never()).await;

    let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            VerificationStatus::Valid,
            VerificationStatus::Valid,
            VerificationStatus::Error,
            VerificationStatus::Invalid,
        ]
    );
    assert_eq!(report.outcomes[1].fingerprint, Some(judy));
    assert_eq!(report.outcomes[2].label.as_deref(), Some("Mallory"));
    assert!(report.outcomes[2].fingerprint.is_none());
    assert_eq!(registry.verify_calls(), 3);
}

#[test]
fn test_unsupported_spreadsheet_type() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    assert!(BatchJob::from_spreadsheet(file.path()).is_err());
}

#[test]
fn test_render_numeric_cells() {
    assert_eq!(render_cell(&Data::Empty), "");
    assert_eq!(render_cell(&Data::Int(42)), "42");
    assert_eq!(render_cell(&Data::Float(255.0)), "255");
    assert_eq!(render_cell(&Data::Float(1.5)), "1.5e0");
    assert_eq!(render_cell(&Data::String("  0xab ".into())), "0xab");
}

#[tokio::test]
async fn test_stalled_network_check_fails_every_entry_in_time() {
    let registry = Arc::new(MemoryRegistry::new());
    let expected = ChainPreset::Local.params().unwrap();
    let agent = Arc::new(MockAgent::attached_to(&expected).with_behavior(MockBehavior::Stall));
    let selector = Arc::new(NetworkSelector::new(Some(agent), expected));
    let client = RegistryClient::new(registry.clone(), selector)
        .with_retry_policy(RetryPolicy::none())
        .with_timeouts(Duration::from_millis(50), Duration::from_millis(50));
    let verifier = BatchVerifier::new(Arc::new(client), 4);

    let job = BatchJob::from_manual(&format!("{} {} {}", Fingerprint::zero(), 1, 2));
    let report = tokio::time::timeout(
        Duration::from_secs(2),
        verifier.run_batch(job, CancellationToken::never()),
    )
    .await
    .expect("batch blocked behind a stalled network check");

    assert_eq!(report.total(), 3);
    assert_eq!(report.errors, 3);
    assert_eq!(registry.total_calls(), 0);
}
