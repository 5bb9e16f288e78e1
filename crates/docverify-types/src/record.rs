use crate::fingerprint::Fingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RECORD_FIELD_COUNT: usize = 11;

pub const RECORD_FIELD_NAMES: [&str; RECORD_FIELD_COUNT] = [
    "full_name",
    "dob",
    "gender",
    "address",
    "phone",
    "email",
    "aadhaar",
    "pan",
    "passport",
    "driving_license",
    "voter_id",
];

pub type RecordTuple = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

/// Identity attributes bound to a fingerprint when it is registered. Field
/// order matches the registry's argument and return order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    pub full_name: String,
    pub dob: String,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub aadhaar: String,
    pub pan: String,
    pub passport: String,
    pub driving_license: String,
    pub voter_id: String,
}

impl DocumentRecord {
    pub fn with_name(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn fields(&self) -> [(&'static str, &str); RECORD_FIELD_COUNT] {
        [
            (RECORD_FIELD_NAMES[0], self.full_name.as_str()),
            (RECORD_FIELD_NAMES[1], self.dob.as_str()),
            (RECORD_FIELD_NAMES[2], self.gender.as_str()),
            (RECORD_FIELD_NAMES[3], self.address.as_str()),
            (RECORD_FIELD_NAMES[4], self.phone.as_str()),
            (RECORD_FIELD_NAMES[5], self.email.as_str()),
            (RECORD_FIELD_NAMES[6], self.aadhaar.as_str()),
            (RECORD_FIELD_NAMES[7], self.pan.as_str()),
            (RECORD_FIELD_NAMES[8], self.passport.as_str()),
            (RECORD_FIELD_NAMES[9], self.driving_license.as_str()),
            (RECORD_FIELD_NAMES[10], self.voter_id.as_str()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.trim().is_empty())
    }

    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            dob: self.dob.trim().to_string(),
            gender: self.gender.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            aadhaar: self.aadhaar.trim().to_string(),
            pan: self.pan.trim().to_uppercase(),
            passport: self.passport.trim().to_uppercase(),
            driving_license: self.driving_license.trim().to_uppercase(),
            voter_id: self.voter_id.trim().to_uppercase(),
        }
    }

    pub fn into_tuple(self) -> RecordTuple {
        (
            self.full_name,
            self.dob,
            self.gender,
            self.address,
            self.phone,
            self.email,
            self.aadhaar,
            self.pan,
            self.passport,
            self.driving_license,
            self.voter_id,
        )
    }

    pub fn from_tuple(t: RecordTuple) -> Self {
        Self {
            full_name: t.0,
            dob: t.1,
            gender: t.2,
            address: t.3,
            phone: t.4,
            email: t.5,
            aadhaar: t.6,
            pan: t.7,
            passport: t.8,
            driving_license: t.9,
            voter_id: t.10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptHandle {
    pub fingerprint: Fingerprint,
    pub transaction_hash: String,
    pub block_number: Option<u64>,
    pub confirmed_at: DateTime<Utc>,
}

impl ReceiptHandle {
    pub fn new(fingerprint: Fingerprint, transaction_hash: impl Into<String>, block_number: Option<u64>) -> Self {
        Self {
            fingerprint,
            transaction_hash: transaction_hash.into(),
            block_number,
            confirmed_at: Utc::now(),
        }
    }
}
