use crate::error::{DocverifyError, DocverifyResult, NormalizationFailure};
use crate::{FINGERPRINT_HEX_LEN, FINGERPRINT_MARKER, FINGERPRINT_SIZE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_SIZE]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; FINGERPRINT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("{}{}", FINGERPRINT_MARKER, hex::encode(self.0))
    }

    /// Strict parse: marker followed by exactly 64 hex digits. Lenient
    /// reconciliation of other encodings lives in the normalizer.
    pub fn from_hex(s: &str) -> DocverifyResult<Self> {
        let digits = s
            .strip_prefix(FINGERPRINT_MARKER)
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| DocverifyError::normalization(s, NormalizationFailure::Unrecognized))?;
        Self::from_bare_hex(digits).map_err(|reason| DocverifyError::normalization(s, reason))
    }

    pub fn from_bare_hex(digits: &str) -> Result<Self, NormalizationFailure> {
        if digits.len() != FINGERPRINT_HEX_LEN {
            return Err(NormalizationFailure::BadLength(digits.len()));
        }
        let mut bytes = [0u8; FINGERPRINT_SIZE];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| NormalizationFailure::NonHex)?;
        Ok(Self(bytes))
    }

    pub fn zero() -> Self {
        Self([0u8; FINGERPRINT_SIZE])
    }

    pub fn short(&self) -> String {
        let hex = self.to_hex();
        format!("{}...{}", &hex[..10], &hex[hex.len() - 6..])
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = DocverifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; FINGERPRINT_SIZE]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_SIZE]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0xab34000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_hex_round_trip() {
        let fp = Fingerprint::from_hex(SAMPLE).unwrap();
        assert_eq!(fp.to_hex(), SAMPLE);
        assert_eq!(fp.to_hex().len(), 66);
        assert_eq!(fp.as_bytes()[0], 0xab);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = Fingerprint::from_hex("0xabcd").unwrap_err();
        assert!(matches!(
            err,
            DocverifyError::Normalization { reason: NormalizationFailure::BadLength(4), .. }
        ));
    }

    #[test]
    fn test_rejects_missing_marker() {
        assert!(Fingerprint::from_hex(&SAMPLE[2..]).is_err());
    }

    #[test]
    fn test_uppercase_is_rendered_lowercase() {
        let upper = format!("0x{}", SAMPLE[2..].to_uppercase());
        let fp: Fingerprint = upper.parse().unwrap();
        assert_eq!(fp.to_string(), SAMPLE);
    }

    #[test]
    fn test_serde_as_string() {
        let fp = Fingerprint::from_hex(SAMPLE).unwrap();
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fp);
    }

    #[test]
    fn test_short_form() {
        let fp = Fingerprint::from_hex(SAMPLE).unwrap();
        assert_eq!(fp.short(), "0xab340000...000001");
    }
}
