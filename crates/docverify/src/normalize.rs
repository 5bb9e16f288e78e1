//! Reconciles fingerprint strings as they arrive from people, spreadsheets and
//! QR payloads into the canonical `0x` + 64 lowercase hex form.

use docverify_types::{DocverifyError, Fingerprint, NormalizationFailure, FINGERPRINT_HEX_LEN, FINGERPRINT_MARKER, FINGERPRINT_SIZE};
use ethers::types::U256;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?$").expect("static regex")
});

// 2^256 has 78 decimal digits.
const MAX_DECIMAL_DIGITS: i64 = 78;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fingerprint '{input}': {reason}")]
pub struct NormalizationError {
    pub input: String,
    pub reason: NormalizationFailure,
}

impl NormalizationError {
    fn new(input: &str, reason: NormalizationFailure) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

impl From<NormalizationError> for DocverifyError {
    fn from(e: NormalizationError) -> Self {
        DocverifyError::Normalization {
            input: e.input,
            reason: e.reason,
        }
    }
}

pub fn normalize(raw: &str) -> Result<Fingerprint, NormalizationError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(NormalizationError::new(raw, NormalizationFailure::Empty));
    }

    if let Some(digits) = input
        .strip_prefix(FINGERPRINT_MARKER)
        .or_else(|| input.strip_prefix("0X"))
    {
        return Fingerprint::from_bare_hex(digits).map_err(|reason| NormalizationError::new(raw, reason));
    }

    if input.len() == FINGERPRINT_HEX_LEN && input.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Fingerprint::from_bare_hex(input).map_err(|reason| NormalizationError::new(raw, reason));
    }

    if let Some(result) = parse_numeric(input) {
        return result.map_err(|reason| NormalizationError::new(raw, reason));
    }

    let reason = if input.bytes().all(|b| b.is_ascii_hexdigit()) {
        NormalizationFailure::BadLength(input.len())
    } else {
        NormalizationFailure::Unrecognized
    };
    Err(NormalizationError::new(raw, reason))
}

pub fn is_canonical(raw: &str) -> bool {
    raw.len() == FINGERPRINT_MARKER.len() + FINGERPRINT_HEX_LEN
        && raw.starts_with(FINGERPRINT_MARKER)
        && raw[FINGERPRINT_MARKER.len()..]
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Spreadsheets turn long hex-like values into decimal or scientific
/// notation. Returns `None` when `input` is not numeric at all.
fn parse_numeric(input: &str) -> Option<Result<Fingerprint, NormalizationFailure>> {
    let caps = NUMERIC.captures(input)?;
    let int_part = caps.get(1).map_or("", |m| m.as_str());
    let frac_part = caps.get(2).map_or("", |m| m.as_str());
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let exponent: i64 = match caps.get(3) {
        Some(m) => match m.as_str().parse() {
            Ok(e) => e,
            Err(_) => return Some(Err(NormalizationFailure::Overflow)),
        },
        None => 0,
    };

    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);

    let shift = exponent.saturating_sub(frac_part.len() as i64);
    Some(scale_decimal(&digits, shift).map(u256_to_fingerprint))
}

fn scale_decimal(digits: &str, shift: i64) -> Result<U256, NormalizationFailure> {
    let significant = if shift < 0 {
        let drop = usize::try_from(shift.unsigned_abs()).map_err(|_| NormalizationFailure::NotInteger)?;
        if drop > digits.len() {
            if digits.bytes().all(|b| b == b'0') {
                return Ok(U256::zero());
            }
            return Err(NormalizationFailure::NotInteger);
        }
        let (kept, dropped) = digits.split_at(digits.len() - drop);
        if !dropped.bytes().all(|b| b == b'0') {
            return Err(NormalizationFailure::NotInteger);
        }
        kept
    } else {
        digits
    };

    let trimmed = significant.trim_start_matches('0');
    if trimmed.is_empty() {
        return Ok(U256::zero());
    }

    let base = U256::from_dec_str(trimmed).map_err(|_| NormalizationFailure::Overflow)?;
    if shift <= 0 {
        return Ok(base);
    }
    if shift > MAX_DECIMAL_DIGITS {
        return Err(NormalizationFailure::Overflow);
    }

    let scale = U256::from(10u8)
        .checked_pow(U256::from(shift as u64))
        .ok_or(NormalizationFailure::Overflow)?;
    base.checked_mul(scale).ok_or(NormalizationFailure::Overflow)
}

fn u256_to_fingerprint(value: U256) -> Fingerprint {
    let mut bytes = [0u8; FINGERPRINT_SIZE];
    value.to_big_endian(&mut bytes);
    Fingerprint::from_bytes(bytes)
}
