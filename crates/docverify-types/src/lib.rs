#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod error;
mod fingerprint;
mod outcome;
mod record;

pub use error::{DocverifyError, DocverifyResult, NormalizationFailure};
pub use fingerprint::Fingerprint;
pub use outcome::{BatchStatus, RecentActivityEntry, VerificationOutcome, VerificationStatus};
pub use record::{DocumentRecord, ReceiptHandle, RecordTuple, RECORD_FIELD_COUNT, RECORD_FIELD_NAMES};

pub const FINGERPRINT_SIZE: usize = 32;

pub const FINGERPRINT_MARKER: &str = "0x";

pub const FINGERPRINT_HEX_LEN: usize = FINGERPRINT_SIZE * 2;

pub const FINGERPRINT_STR_LEN: usize = FINGERPRINT_MARKER.len() + FINGERPRINT_HEX_LEN;

pub const RECENT_ACTIVITY_CAPACITY: usize = 5;
