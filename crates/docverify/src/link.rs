use crate::normalize::normalize;
use docverify_types::{DocverifyError, DocverifyResult, Fingerprint, NormalizationFailure};
use url::Url;

pub const DEFAULT_LINK_BASE: &str = "http://localhost:3000";
const VERIFY_PATH: &str = "verify";
const HASH_PARAM: &str = "hash";

fn parse_base(base_url: &str) -> DocverifyResult<Url> {
    let mut base = Url::parse(base_url.trim())
        .map_err(|e| DocverifyError::Config(format!("Invalid link base {}: {}", base_url, e)))?;

    if base.cannot_be_a_base() {
        return Err(DocverifyError::Config(format!("Link base {} cannot hold a path", base_url)));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// `<base>/verify?hash=<fingerprint>`
pub fn verification_link(base_url: &str, fingerprint: &Fingerprint) -> DocverifyResult<Url> {
    let mut link = parse_base(base_url)?
        .join(VERIFY_PATH)
        .map_err(|e| DocverifyError::Config(format!("Invalid link base {}: {}", base_url, e)))?;

    link.query_pairs_mut()
        .clear()
        .append_pair(HASH_PARAM, &fingerprint.to_hex());
    Ok(link)
}

/// Pulls the `hash` parameter out of a verification link and normalizes it.
pub fn fingerprint_from_link(link: &str) -> DocverifyResult<Fingerprint> {
    let url = Url::parse(link.trim())
        .map_err(|_| DocverifyError::normalization(link, NormalizationFailure::Unrecognized))?;

    let raw = url
        .query_pairs()
        .find(|(key, _)| key == HASH_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| DocverifyError::normalization(link, NormalizationFailure::Empty))?;

    Ok(normalize(&raw)?)
}
