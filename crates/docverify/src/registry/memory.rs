use super::backend::Registry;
use async_trait::async_trait;
use docverify_crypto::FingerprintHasher;
use docverify_types::{DocumentRecord, DocverifyError, DocverifyResult, Fingerprint, ReceiptHandle};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
struct Ledger {
    records: HashMap<Fingerprint, DocumentRecord>,
    last_verify: HashMap<Fingerprint, bool>,
    vanished: HashSet<Fingerprint>,
    malformed: HashSet<Fingerprint>,
    reverting: HashSet<Fingerprint>,
    block: u64,
    add_calls: u32,
    verify_calls: u32,
    details_calls: u32,
    pending_failures: u32,
}

/// Append-only in-process registry. Counts every call and can inject
/// transient failures, so client and batch behavior can be asserted
/// without a node.
///
/// Requesting details for a fingerprint whose latest verify answered `false`
/// panics: no caller is allowed to do that.
#[derive(Default)]
pub struct MemoryRegistry {
    ledger: Mutex<Ledger>,
    latency: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Pre-populates a record as if it had been registered earlier.
    pub fn seed(&self, fingerprint: Fingerprint, record: DocumentRecord) {
        self.ledger.lock().records.insert(fingerprint, record);
    }

    /// The next `count` calls of any kind fail with `NetworkFailure`.
    pub fn fail_next(&self, count: u32) {
        self.ledger.lock().pending_failures = count;
    }

    /// Verify keeps answering `true` but the details lookup misses, as when
    /// the record is gone between the two reads.
    pub fn vanish_details(&self, fingerprint: Fingerprint) {
        self.ledger.lock().vanished.insert(fingerprint);
    }

    pub fn corrupt_details(&self, fingerprint: Fingerprint) {
        self.ledger.lock().malformed.insert(fingerprint);
    }

    /// The contract reverts `verifyDocument` for this fingerprint.
    pub fn revert_verify(&self, fingerprint: Fingerprint) {
        self.ledger.lock().reverting.insert(fingerprint);
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.ledger.lock().records.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.ledger.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_calls(&self) -> u32 {
        self.ledger.lock().add_calls
    }

    pub fn verify_calls(&self) -> u32 {
        self.ledger.lock().verify_calls
    }

    pub fn details_calls(&self) -> u32 {
        self.ledger.lock().details_calls
    }

    pub fn total_calls(&self) -> u32 {
        let ledger = self.ledger.lock();
        ledger.add_calls + ledger.verify_calls + ledger.details_calls
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn take_failure(ledger: &mut Ledger) -> DocverifyResult<()> {
        if ledger.pending_failures > 0 {
            ledger.pending_failures -= 1;
            return Err(DocverifyError::NetworkFailure("injected transport failure".into()));
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn receipt_hash(fingerprint: &Fingerprint, block: u64) -> String {
        let mut hasher = FingerprintHasher::new();
        hasher.update(fingerprint.as_bytes());
        hasher.update(&block.to_be_bytes());
        hasher.finalize().to_hex()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn add_document_hash(&self, fingerprint: &Fingerprint, record: &DocumentRecord) -> DocverifyResult<ReceiptHandle> {
        self.simulate_latency().await;

        let mut ledger = self.ledger.lock();
        ledger.add_calls += 1;
        Self::take_failure(&mut ledger)?;

        if ledger.records.contains_key(fingerprint) {
            return Err(DocverifyError::RejectedByRegistry(format!(
                "{} is already registered",
                fingerprint.short()
            )));
        }

        ledger.block += 1;
        let block = ledger.block;
        ledger.records.insert(*fingerprint, record.clone());

        Ok(ReceiptHandle::new(
            *fingerprint,
            Self::receipt_hash(fingerprint, block),
            Some(block),
        ))
    }

    async fn verify_document(&self, fingerprint: &Fingerprint) -> DocverifyResult<bool> {
        self.simulate_latency().await;

        let mut ledger = self.ledger.lock();
        ledger.verify_calls += 1;
        Self::take_failure(&mut ledger)?;

        if ledger.reverting.contains(fingerprint) {
            return Err(DocverifyError::RejectedByRegistry(format!(
                "verifyDocument reverted for {}",
                fingerprint.short()
            )));
        }

        let registered = ledger.records.contains_key(fingerprint);
        ledger.last_verify.insert(*fingerprint, registered);
        Ok(registered)
    }

    async fn get_student_details(&self, fingerprint: &Fingerprint) -> DocverifyResult<DocumentRecord> {
        self.simulate_latency().await;

        let mut ledger = self.ledger.lock();
        ledger.details_calls += 1;

        assert!(
            ledger.last_verify.get(fingerprint) != Some(&false),
            "details requested for {} after verify returned false",
            fingerprint
        );

        Self::take_failure(&mut ledger)?;

        if ledger.vanished.contains(fingerprint) {
            return Err(DocverifyError::NotFound(fingerprint.to_hex()));
        }
        if ledger.malformed.contains(fingerprint) {
            return Err(DocverifyError::MalformedRecord(format!(
                "could not decode details for {}",
                fingerprint.short()
            )));
        }

        ledger
            .records
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| DocverifyError::NotFound(fingerprint.to_hex()))
    }
}
