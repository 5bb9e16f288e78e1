use crate::fingerprint::Fingerprint;
use crate::record::DocumentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Valid,
    Invalid,
    Error,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Valid => write!(f, "valid"),
            VerificationStatus::Invalid => write!(f, "invalid"),
            VerificationStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub input: String,
    pub fingerprint: Option<Fingerprint>,
    pub label: Option<String>,
    pub status: VerificationStatus,
    pub record: Option<DocumentRecord>,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

impl VerificationOutcome {
    pub fn valid(input: impl Into<String>, fingerprint: Fingerprint, record: DocumentRecord) -> Self {
        Self {
            input: input.into(),
            fingerprint: Some(fingerprint),
            label: None,
            status: VerificationStatus::Valid,
            record: Some(record),
            message: "Certificate is VALID".to_string(),
            checked_at: Utc::now(),
        }
    }

    pub fn invalid(input: impl Into<String>, fingerprint: Fingerprint, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            fingerprint: Some(fingerprint),
            label: None,
            status: VerificationStatus::Invalid,
            record: None,
            message: message.into(),
            checked_at: Utc::now(),
        }
    }

    pub fn error(input: impl Into<String>, fingerprint: Option<Fingerprint>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            fingerprint,
            label: None,
            status: VerificationStatus::Error,
            record: None,
            message: message.into(),
            checked_at: Utc::now(),
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.status == VerificationStatus::Valid
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    AllValid,
    SomeInvalid,
}

impl BatchStatus {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a VerificationOutcome>) -> Self {
        if outcomes.into_iter().all(VerificationOutcome::is_valid) {
            BatchStatus::AllValid
        } else {
            BatchStatus::SomeInvalid
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::AllValid => write!(f, "All Valid"),
            BatchStatus::SomeInvalid => write!(f, "Some Invalid"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivityEntry {
    pub fingerprint: Fingerprint,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl RecentActivityEntry {
    pub fn new(fingerprint: Fingerprint, label: impl Into<String>) -> Self {
        Self {
            fingerprint,
            label: label.into(),
            created_at: Utc::now(),
        }
    }
}
