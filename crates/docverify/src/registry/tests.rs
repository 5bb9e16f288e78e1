use super::*;
use crate::network::{ChainPreset, MockAgent, MockBehavior, NetworkSelector};
use crate::validation::ValidationPolicy;
use docverify_crypto::fingerprint_bytes;
use docverify_types::{DocumentRecord, DocverifyError, Fingerprint, VerificationStatus};
use std::sync::Arc;
use std::time::Duration;

fn jane_doe() -> DocumentRecord {
    DocumentRecord {
        full_name: "Jane Doe".into(),
        dob: "1990-04-12".into(),
        gender: "Female".into(),
        address: "12 MG Road, Pune".into(),
        phone: "9876543210".into(),
        email: "jane@example.com".into(),
        aadhaar: "2345 6789 0123".into(),
        pan: "ABCDE1234F".into(),
        passport: "K1234567".into(),
        driving_license: "MH-12-2015-1234567".into(),
        voter_id: "XYZ1234567".into(),
    }
}

fn client_with(registry: Arc<MemoryRegistry>, agent: Arc<MockAgent>) -> RegistryClient {
    let expected = ChainPreset::Local.params().unwrap();
    let selector = Arc::new(NetworkSelector::new(Some(agent), expected));
    RegistryClient::new(registry, selector).with_retry_policy(RetryPolicy::immediate(2))
}

fn setup() -> (Arc<MemoryRegistry>, Arc<MockAgent>, RegistryClient) {
    let registry = Arc::new(MemoryRegistry::new());
    let agent = Arc::new(MockAgent::attached_to(&ChainPreset::Local.params().unwrap()));
    let client = client_with(registry.clone(), agent.clone());
    (registry, agent, client)
}

#[tokio::test]
async fn test_add_verify_details_round_trip() {
    let (registry, _agent, client) = setup();
    let fp = fingerprint_bytes(b"jane-doe-degree.pdf contents");

    let receipt = client.add(&fp, &jane_doe()).await.unwrap();
    assert_eq!(receipt.fingerprint, fp);
    assert_eq!(receipt.block_number, Some(1));
    assert!(receipt.transaction_hash.starts_with("0x"));

    assert!(client.verify(&fp).await.unwrap());

    let outcome = client.check(&fp.to_hex(), fp).await;
    assert_eq!(outcome.status, VerificationStatus::Valid);
    assert_eq!(outcome.record.unwrap(), jane_doe());
    assert_eq!(outcome.message, "Certificate is VALID");
    assert_eq!(registry.add_calls(), 1);
}

#[tokio::test]
async fn test_add_switches_network_first() {
    let registry = Arc::new(MemoryRegistry::new());
    let agent = Arc::new(MockAgent::on_chain(1));
    let client = client_with(registry.clone(), agent.clone());

    client.add(&fingerprint_bytes(b"doc"), &jane_doe()).await.unwrap();

    assert_eq!(agent.current_chain(), 31337);
    assert_eq!(agent.add_calls(), 1);
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_add_stores_trimmed_record() {
    let (registry, _agent, client) = setup();
    let fp = fingerprint_bytes(b"trim");
    let mut record = jane_doe();
    record.full_name = "  Jane Doe ".into();
    record.pan = "abcde1234f".into();

    client.add(&fp, &record).await.unwrap();

    let verified = client.verify_for_details(&fp).await.unwrap().unwrap();
    let stored = client.get_details(&verified).await.unwrap();
    assert_eq!(stored.full_name, "Jane Doe");
    assert_eq!(stored.pan, "ABCDE1234F");
    assert!(registry.contains(&fp));
}

#[tokio::test]
async fn test_unregistered_zero_fingerprint() {
    let (registry, _agent, client) = setup();
    let zero = Fingerprint::zero();

    assert!(!client.verify(&zero).await.unwrap());
    assert!(client.verify_for_details(&zero).await.unwrap().is_none());

    let outcome = client.check(&zero.to_hex(), zero).await;
    assert_eq!(outcome.status, VerificationStatus::Invalid);
    assert!(outcome.record.is_none());
    assert_eq!(registry.details_calls(), 0);
}

#[tokio::test]
async fn test_duplicate_add_rejected() {
    let (registry, _agent, client) = setup();
    let fp = fingerprint_bytes(b"once");

    client.add(&fp, &jane_doe()).await.unwrap();
    let err = client.add(&fp, &jane_doe()).await.unwrap_err();

    assert!(matches!(err, DocverifyError::RejectedByRegistry(_)));
    assert_eq!(registry.add_calls(), 2);
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_validation_blocks_network_call() {
    let (registry, agent, client) = setup();
    let mut record = jane_doe();
    record.phone = "12345".into();

    let err = client.add(&fingerprint_bytes(b"x"), &record).await.unwrap_err();

    assert!(matches!(err, DocverifyError::Validation { field: "phone", .. }));
    assert_eq!(registry.total_calls(), 0);
    assert_eq!(agent.switch_calls(), 0);
}

#[tokio::test]
async fn test_format_only_policy_allows_sparse_record() {
    let (registry, _agent, client) = setup();
    let client = client.with_validation(ValidationPolicy::FormatOnly);

    client
        .add(&fingerprint_bytes(b"sparse"), &DocumentRecord::with_name("Jane Doe"))
        .await
        .unwrap();
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_read_only_agent_cannot_add() {
    let registry = Arc::new(MemoryRegistry::new());
    let agent = Arc::new(MockAgent::attached_to(&ChainPreset::Local.params().unwrap()).read_only());
    let client = client_with(registry.clone(), agent);

    let err = client.add(&fingerprint_bytes(b"doc"), &jane_doe()).await.unwrap_err();
    assert!(matches!(err, DocverifyError::RejectedByRegistry(_)));
    assert_eq!(registry.add_calls(), 0);
}

#[tokio::test]
async fn test_verify_retries_network_failure() {
    let (registry, _agent, client) = setup();
    let fp = fingerprint_bytes(b"flaky");
    registry.seed(fp, jane_doe());
    registry.fail_next(2);

    assert!(client.verify(&fp).await.unwrap());
    assert_eq!(registry.verify_calls(), 3);
}

#[tokio::test]
async fn test_verify_gives_up_after_retries() {
    let (registry, _agent, client) = setup();
    registry.fail_next(10);

    let err = client.verify(&Fingerprint::zero()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(registry.verify_calls(), 3);
}

#[tokio::test]
async fn test_add_not_retried_by_default() {
    let (registry, _agent, client) = setup();
    registry.fail_next(1);

    let err = client.add(&fingerprint_bytes(b"doc"), &jane_doe()).await.unwrap_err();
    assert!(matches!(err, DocverifyError::NetworkFailure(_)));
    assert_eq!(registry.add_calls(), 1);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_add_retried_when_configured() {
    let registry = Arc::new(MemoryRegistry::new());
    let agent = Arc::new(MockAgent::attached_to(&ChainPreset::Local.params().unwrap()));
    let client = client_with(registry.clone(), agent).with_retry_policy(RetryPolicy {
        write_retries: 1,
        ..RetryPolicy::immediate(0)
    });
    registry.fail_next(1);

    client.add(&fingerprint_bytes(b"doc"), &jane_doe()).await.unwrap();
    assert_eq!(registry.add_calls(), 2);
}

#[tokio::test]
async fn test_record_gone_after_verify_is_invalid() {
    let (registry, _agent, client) = setup();
    let fp = fingerprint_bytes(b"vanishing");
    registry.seed(fp, jane_doe());
    registry.vanish_details(fp);

    let outcome = client.check("vanishing", fp).await;
    assert_eq!(outcome.status, VerificationStatus::Invalid);
    assert!(outcome.message.contains("not found"));
}

#[tokio::test]
async fn test_malformed_details_is_invalid() {
    let (registry, _agent, client) = setup();
    let fp = fingerprint_bytes(b"garbled");
    registry.seed(fp, jane_doe());
    registry.corrupt_details(fp);

    let outcome = client.check("garbled", fp).await;
    assert_eq!(outcome.status, VerificationStatus::Invalid);
}

#[tokio::test]
async fn test_switch_rejection_becomes_error_outcome() {
    let registry = Arc::new(MemoryRegistry::new());
    let agent = Arc::new(MockAgent::on_chain(1).with_behavior(MockBehavior::RejectSwitch));
    let client = client_with(registry.clone(), agent);

    let outcome = client.check("x", Fingerprint::zero()).await;
    assert_eq!(outcome.status, VerificationStatus::Error);
    assert_eq!(outcome.fingerprint, Some(Fingerprint::zero()));
    assert_eq!(registry.total_calls(), 0);
}

#[tokio::test]
async fn test_missing_agent_is_unsupported() {
    let registry = Arc::new(MemoryRegistry::new());
    let selector = Arc::new(NetworkSelector::new(None, ChainPreset::Local.params().unwrap()));
    let client = RegistryClient::new(registry, selector);

    let err = client.verify(&Fingerprint::zero()).await.unwrap_err();
    assert!(matches!(err, DocverifyError::UnsupportedAgent));
}

#[tokio::test]
async fn test_check_raw_skips_network_for_bad_input() {
    let (registry, _agent, client) = setup();

    let outcome = client.check_raw("not-a-hash").await;
    assert_eq!(outcome.status, VerificationStatus::Error);
    assert_eq!(outcome.input, "not-a-hash");
    assert!(outcome.fingerprint.is_none());
    assert_eq!(registry.total_calls(), 0);
}

#[tokio::test]
async fn test_check_raw_accepts_decimal_encoding() {
    let (registry, _agent, client) = setup();
    let fp = Fingerprint::from_bytes({
        let mut bytes = [0u8; 32];
        bytes[31] = 0xff;
        bytes
    });
    registry.seed(fp, jane_doe());

    let outcome = client.check_raw("255").await;
    assert_eq!(outcome.status, VerificationStatus::Valid);
    assert_eq!(outcome.fingerprint, Some(fp));
}

#[tokio::test]
#[should_panic(expected = "after verify returned false")]
async fn test_memory_registry_guards_details_after_false_verify() {
    let registry = MemoryRegistry::new();
    let fp = Fingerprint::zero();
    assert!(!registry.verify_document(&fp).await.unwrap());
    let _ = registry.get_student_details(&fp).await;
}

#[tokio::test]
async fn test_reverted_verify_is_error_and_not_retried() {
    let (registry, _agent, client) = setup();
    let fp = fingerprint_bytes(b"reverting");
    registry.seed(fp, jane_doe());
    registry.revert_verify(fp);

    let outcome = client.check("reverting", fp).await;
    assert_eq!(outcome.status, VerificationStatus::Error);
    assert!(outcome.message.contains("reverted"));
    assert_eq!(registry.verify_calls(), 1);
    assert_eq!(registry.details_calls(), 0);
}

#[tokio::test]
async fn test_stalled_agent_bounded_by_call_timeout() {
    let registry = Arc::new(MemoryRegistry::new());
    let agent = Arc::new(
        MockAgent::attached_to(&ChainPreset::Local.params().unwrap()).with_behavior(MockBehavior::Stall),
    );
    let client = client_with(registry.clone(), agent)
        .with_retry_policy(RetryPolicy::none())
        .with_timeouts(Duration::from_millis(50), Duration::from_millis(50));

    let zero = format!("0x{}", "0".repeat(64));
    let outcome = tokio::time::timeout(Duration::from_secs(2), client.check_raw(&zero))
        .await
        .expect("check outlived the call timeout");
    assert_eq!(outcome.status, VerificationStatus::Error);
    assert!(outcome.message.contains("timed out"));
    assert_eq!(registry.total_calls(), 0);
}

#[tokio::test]
async fn test_stalled_agent_does_not_block_later_checks() {
    let registry = Arc::new(MemoryRegistry::new());
    let agent = Arc::new(
        MockAgent::attached_to(&ChainPreset::Local.params().unwrap()).with_behavior(MockBehavior::Stall),
    );
    let client = Arc::new(
        client_with(registry.clone(), agent.clone())
            .with_retry_policy(RetryPolicy::none())
            .with_timeouts(Duration::from_millis(50), Duration::from_millis(50)),
    );
    let fp = fingerprint_bytes(b"after the stall");
    registry.seed(fp, jane_doe());

    let stalled = client.check("stalled", fp).await;
    assert_eq!(stalled.status, VerificationStatus::Error);

    agent.set_behavior(MockBehavior::Cooperative);
    let outcome = tokio::time::timeout(Duration::from_secs(2), client.check("recovered", fp))
        .await
        .expect("selector still held by the stalled negotiation");
    assert_eq!(outcome.status, VerificationStatus::Valid);
}
