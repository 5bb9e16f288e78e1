use super::backend::Registry;
use super::retry::{with_retry, with_timeout, RetryPolicy};
use crate::network::NetworkSelector;
use crate::normalize::normalize;
use crate::validation::{validate_record, ValidationPolicy};
use docverify_types::{
    DocumentRecord, DocverifyError, DocverifyResult, Fingerprint, ReceiptHandle, VerificationOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(120);

const NOT_REGISTERED: &str = "Certificate is INVALID or not registered";

/// Proof that the registry answered `true` for this fingerprint. Only
/// [`RegistryClient::verify_for_details`] hands these out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifiedFingerprint(Fingerprint);

impl VerifiedFingerprint {
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.0
    }
}

pub struct RegistryClient {
    registry: Arc<dyn Registry>,
    selector: Arc<NetworkSelector>,
    retry: RetryPolicy,
    call_timeout: Duration,
    confirm_timeout: Duration,
    validation: ValidationPolicy,
}

impl RegistryClient {
    pub fn new(registry: Arc<dyn Registry>, selector: Arc<NetworkSelector>) -> Self {
        Self {
            registry,
            selector,
            retry: RetryPolicy::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            validation: ValidationPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeouts(mut self, call: Duration, confirm: Duration) -> Self {
        self.call_timeout = call;
        self.confirm_timeout = confirm;
        self
    }

    pub fn with_validation(mut self, policy: ValidationPolicy) -> Self {
        self.validation = policy;
        self
    }

    pub fn selector(&self) -> &Arc<NetworkSelector> {
        &self.selector
    }

    /// Network negotiation shares the per-call budget. Giving up drops the
    /// pending negotiation, which frees the selector for the next caller.
    async fn ensure_network(&self) -> DocverifyResult<()> {
        with_timeout(
            "network check",
            self.call_timeout,
            self.selector.ensure_expected_network(),
        )
        .await
    }

    /// Registers `fingerprint` with the given identity attributes. The record
    /// is trimmed and validated before anything touches the network.
    pub async fn add(&self, fingerprint: &Fingerprint, record: &DocumentRecord) -> DocverifyResult<ReceiptHandle> {
        let record = record.trimmed();
        validate_record(&record, self.validation)?;

        self.ensure_network().await?;
        if let Some(agent) = self.selector.agent() {
            if !agent.can_sign() {
                return Err(DocverifyError::RejectedByRegistry(
                    "signing agent has no account to sign with".into(),
                ));
            }
        }

        let receipt = with_retry("addDocumentHash", self.retry.write_backoff(), || {
            with_timeout(
                "addDocumentHash",
                self.confirm_timeout,
                self.registry.add_document_hash(fingerprint, &record),
            )
        })
        .await?;

        info!(
            "Registered {} in tx {} (block {:?})",
            fingerprint.short(),
            receipt.transaction_hash,
            receipt.block_number
        );
        Ok(receipt)
    }

    pub async fn verify(&self, fingerprint: &Fingerprint) -> DocverifyResult<bool> {
        self.ensure_network().await?;

        let registered = with_retry("verifyDocument", self.retry.read_backoff(), || {
            with_timeout(
                "verifyDocument",
                self.call_timeout,
                self.registry.verify_document(fingerprint),
            )
        })
        .await?;

        debug!("{} registered: {}", fingerprint.short(), registered);
        Ok(registered)
    }

    pub async fn verify_for_details(&self, fingerprint: &Fingerprint) -> DocverifyResult<Option<VerifiedFingerprint>> {
        Ok(self
            .verify(fingerprint)
            .await?
            .then_some(VerifiedFingerprint(*fingerprint)))
    }

    pub async fn get_details(&self, verified: &VerifiedFingerprint) -> DocverifyResult<DocumentRecord> {
        let fingerprint = verified.fingerprint();
        self.ensure_network().await?;

        with_retry("getStudentDetails", self.retry.read_backoff(), || {
            with_timeout(
                "getStudentDetails",
                self.call_timeout,
                self.registry.get_student_details(fingerprint),
            )
        })
        .await
    }

    /// Verify followed by a details fetch, folded into a single outcome.
    /// Never fails: every error becomes an `Error` or `Invalid` outcome.
    pub async fn check(&self, input: &str, fingerprint: Fingerprint) -> VerificationOutcome {
        let verified = match self.verify_for_details(&fingerprint).await {
            Ok(Some(verified)) => verified,
            Ok(None) => return VerificationOutcome::invalid(input, fingerprint, NOT_REGISTERED),
            Err(e) => {
                warn!("Verification of {} failed: {}", fingerprint.short(), e);
                return VerificationOutcome::error(input, Some(fingerprint), e.to_string());
            }
        };

        match self.get_details(&verified).await {
            Ok(record) => VerificationOutcome::valid(input, fingerprint, record),
            Err(e) if e.counts_as_invalid() => {
                warn!("Details for {} unavailable: {}", fingerprint.short(), e);
                VerificationOutcome::invalid(input, fingerprint, e.to_string())
            }
            Err(e) => {
                warn!("Details fetch for {} failed: {}", fingerprint.short(), e);
                VerificationOutcome::error(input, Some(fingerprint), e.to_string())
            }
        }
    }

    /// Normalizes `raw` and checks it. Input that cannot be normalized never
    /// reaches the registry.
    pub async fn check_raw(&self, raw: &str) -> VerificationOutcome {
        match normalize(raw) {
            Ok(fingerprint) => self.check(raw, fingerprint).await,
            Err(e) => {
                debug!("Skipping unnormalizable input: {}", e);
                VerificationOutcome::error(raw, None, DocverifyError::from(e).to_string())
            }
        }
    }
}
