use chrono::{NaiveDate, Utc};
use docverify_types::{DocumentRecord, DocverifyError, DocverifyResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static regex")
}

static RE_PHONE: Lazy<Regex> = Lazy::new(|| pattern(r"^[6-9][0-9]{9}$"));
static RE_EMAIL: Lazy<Regex> = Lazy::new(|| pattern(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
static RE_AADHAAR: Lazy<Regex> = Lazy::new(|| pattern(r"^[2-9][0-9]{3}\s?[0-9]{4}\s?[0-9]{4}$"));
static RE_PAN: Lazy<Regex> = Lazy::new(|| pattern(r"^[A-Z]{5}[0-9]{4}[A-Z]$"));
static RE_PASSPORT: Lazy<Regex> = Lazy::new(|| pattern(r"^[A-Z][0-9]{7}$"));
static RE_DRIVING_LICENSE: Lazy<Regex> =
    Lazy::new(|| pattern(r"^[A-Z]{2}[-\s]?[0-9]{2}[-\s]?(?:19|20)[0-9]{2}[-\s]?[0-9]{7}$"));
static RE_VOTER_ID: Lazy<Regex> = Lazy::new(|| pattern(r"^[A-Z]{3}[0-9]{7}$"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Name, date of birth, phone and email must be present.
    #[default]
    RequireCore,
    FormatOnly,
}

fn invalid(field: &'static str, message: impl Into<String>) -> DocverifyError {
    DocverifyError::Validation {
        field,
        message: message.into(),
    }
}

fn require(field: &'static str, value: &str) -> DocverifyResult<()> {
    if value.is_empty() {
        return Err(invalid(field, "required"));
    }
    Ok(())
}

fn check(field: &'static str, value: &str, re: &Regex, hint: &str) -> DocverifyResult<()> {
    if !value.is_empty() && !re.is_match(value) {
        return Err(invalid(field, format!("expected {}", hint)));
    }
    Ok(())
}

fn check_dob(value: &str) -> DocverifyResult<()> {
    if value.is_empty() {
        return Ok(());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| invalid("dob", "expected YYYY-MM-DD"))?;
    if date > Utc::now().date_naive() {
        return Err(invalid("dob", "date of birth is in the future"));
    }
    Ok(())
}

/// Checks a record before it is sent to the registry. Letter codes are
/// compared upper-cased; the record is validated in its trimmed form.
pub fn validate_record(record: &DocumentRecord, policy: ValidationPolicy) -> DocverifyResult<()> {
    let r = record.trimmed();

    if policy == ValidationPolicy::RequireCore {
        require("full_name", &r.full_name)?;
        require("dob", &r.dob)?;
        require("phone", &r.phone)?;
        require("email", &r.email)?;
    }

    check_dob(&r.dob)?;
    check("phone", &r.phone, &RE_PHONE, "10 digits starting with 6-9")?;
    check("email", &r.email, &RE_EMAIL, "name@domain")?;
    check("aadhaar", &r.aadhaar, &RE_AADHAAR, "12 digits grouped 4-4-4")?;
    check("pan", &r.pan, &RE_PAN, "5 letters, 4 digits, 1 letter")?;
    check("passport", &r.passport, &RE_PASSPORT, "1 letter followed by 7 digits")?;
    check(
        "driving_license",
        &r.driving_license,
        &RE_DRIVING_LICENSE,
        "state code, RTO code, year and 7 digits",
    )?;
    check("voter_id", &r.voter_id, &RE_VOTER_ID, "3 letters followed by 7 digits")?;

    Ok(())
}
