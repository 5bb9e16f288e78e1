use super::commands::OutputFormat;
use super::utils::{emit, FAIL, OK};
use docverify::config::ClientConfig;
use docverify::{fingerprint_file, normalize, verification_link, DocverifyResult};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct HashReport {
    file: String,
    fingerprint: String,
}

pub fn handle_hash(file: &Path, format: &OutputFormat) -> DocverifyResult<()> {
    let fingerprint = fingerprint_file(file)?;
    let report = HashReport {
        file: file.display().to_string(),
        fingerprint: fingerprint.to_hex(),
    };

    emit(format, &report, |r| println!("{}  {}", r.fingerprint, r.file))
}

#[derive(Serialize)]
struct NormalizeResult {
    input: String,
    fingerprint: Option<String>,
    error: Option<String>,
}

pub fn handle_normalize(inputs: &[String], format: &OutputFormat) -> DocverifyResult<()> {
    let results: Vec<NormalizeResult> = inputs
        .iter()
        .map(|input| match normalize(input) {
            Ok(fp) => NormalizeResult {
                input: input.clone(),
                fingerprint: Some(fp.to_hex()),
                error: None,
            },
            Err(e) => NormalizeResult {
                input: input.clone(),
                fingerprint: None,
                error: Some(e.reason.to_string()),
            },
        })
        .collect();

    emit(format, &results, |results| {
        for r in results {
            match (&r.fingerprint, &r.error) {
                (Some(fp), _) => println!("{} {}", OK, fp),
                (None, Some(e)) => println!("{} {}: {}", FAIL, r.input, e),
                (None, None) => {}
            }
        }
    })
}

#[derive(Serialize)]
struct LinkReport {
    fingerprint: String,
    link: String,
}

pub fn handle_link(raw: &str, base: Option<&str>, config: &ClientConfig, format: &OutputFormat) -> DocverifyResult<()> {
    let fingerprint = normalize(raw)?;
    let link = verification_link(base.unwrap_or(&config.links.base_url), &fingerprint)?;
    let report = LinkReport {
        fingerprint: fingerprint.to_hex(),
        link: link.to_string(),
    };

    emit(format, &report, |r| println!("{}", r.link))
}
