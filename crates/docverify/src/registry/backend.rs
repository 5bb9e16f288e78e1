use async_trait::async_trait;
use docverify_types::{DocumentRecord, DocverifyResult, Fingerprint, ReceiptHandle};

/// The three operations the append-only registry exposes. Implementations
/// classify failures: `RejectedByRegistry` for refused writes, `NetworkFailure`
/// for transport problems, `NotFound`/`MalformedRecord` for detail reads.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn add_document_hash(&self, fingerprint: &Fingerprint, record: &DocumentRecord) -> DocverifyResult<ReceiptHandle>;

    async fn verify_document(&self, fingerprint: &Fingerprint) -> DocverifyResult<bool>;

    async fn get_student_details(&self, fingerprint: &Fingerprint) -> DocverifyResult<DocumentRecord>;
}
