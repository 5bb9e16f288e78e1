use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizationFailure {
    Empty,
    BadLength(usize),
    NonHex,
    NotInteger,
    Overflow,
    Unrecognized,
}

impl fmt::Display for NormalizationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationFailure::Empty => write!(f, "empty input"),
            NormalizationFailure::BadLength(len) => {
                write!(f, "expected 64 hex characters, found {}", len)
            }
            NormalizationFailure::NonHex => write!(f, "contains non-hex characters"),
            NormalizationFailure::NotInteger => write!(f, "numeric value is not an integer"),
            NormalizationFailure::Overflow => write!(f, "numeric value exceeds 256 bits"),
            NormalizationFailure::Unrecognized => write!(f, "unrecognized fingerprint encoding"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DocverifyError {
    #[error("Cannot read input: {0}")]
    InputRead(String),

    #[error("Invalid fingerprint '{input}': {reason}")]
    Normalization {
        input: String,
        reason: NormalizationFailure,
    },

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("No signing agent available")]
    UnsupportedAgent,

    #[error("Network switch rejected: {0}")]
    SwitchRejected(String),

    #[error("Network switch failed: {0}")]
    SwitchFailed(String),

    #[error("Rejected by registry: {0}")]
    RejectedByRegistry(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DocverifyError {
    pub fn normalization(input: impl Into<String>, reason: NormalizationFailure) -> Self {
        DocverifyError::Normalization {
            input: input.into(),
            reason,
        }
    }

    /// Only transient transport failures may be retried; every other variant
    /// is terminal for the operation that produced it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DocverifyError::NetworkFailure(_))
    }

    pub fn counts_as_invalid(&self) -> bool {
        matches!(
            self,
            DocverifyError::NotFound(_) | DocverifyError::MalformedRecord(_)
        )
    }

    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DocverifyError::InputRead(_)
                | DocverifyError::Normalization { .. }
                | DocverifyError::Validation { .. }
        )
    }
}

pub type DocverifyResult<T> = Result<T, DocverifyError>;
