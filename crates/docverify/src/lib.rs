#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod cache;
pub mod cancellation;
pub mod config;
pub mod link;
pub mod network;
pub mod normalize;
pub mod registry;
pub mod validation;

pub use batch::{BatchEntry, BatchJob, BatchReport, BatchSource, BatchVerifier};
pub use cache::RecordCache;
pub use cancellation::{CancelHandle, CancellationToken};
pub use config::ClientConfig;
pub use link::{fingerprint_from_link, verification_link};
pub use network::{ChainParams, ChainPreset, NetworkSelector, RpcAgent, SigningAgent};
pub use normalize::{is_canonical, normalize, NormalizationError};
pub use registry::{ContractRegistry, Registry, RegistryClient, RetryPolicy, VerifiedFingerprint};

#[cfg(any(test, feature = "test-util"))]
pub use network::MockAgent;
#[cfg(any(test, feature = "test-util"))]
pub use registry::MemoryRegistry;
pub use validation::{validate_record, ValidationPolicy};

pub use docverify_crypto::{fingerprint_bytes, fingerprint_file, fingerprint_reader, FingerprintHasher};
pub use docverify_types::{
    BatchStatus, DocumentRecord, DocverifyError, DocverifyResult, Fingerprint, ReceiptHandle,
    RecentActivityEntry, VerificationOutcome, VerificationStatus,
};
