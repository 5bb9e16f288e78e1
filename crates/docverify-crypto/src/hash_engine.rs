use docverify_types::{DocverifyError, DocverifyResult, Fingerprint, FINGERPRINT_SIZE};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

pub const READ_CHUNK_SIZE: usize = 64 * 1024;

pub fn fingerprint_bytes(data: &[u8]) -> Fingerprint {
    let mut hasher = FingerprintHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hashes `reader` in fixed-size chunks. Memory use is bounded by the chunk
/// size regardless of input length; a read error discards the partial digest.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> DocverifyResult<Fingerprint> {
    let mut hasher = FingerprintHasher::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DocverifyError::InputRead(e.to_string())),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize())
}

pub fn fingerprint_file(path: impl AsRef<Path>) -> DocverifyResult<Fingerprint> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| DocverifyError::InputRead(format!("{}: {}", path.display(), e)))?;

    let fingerprint = fingerprint_reader(file)
        .map_err(|e| DocverifyError::InputRead(format!("{}: {}", path.display(), e)))?;

    debug!("Fingerprinted {:?} -> {}", path, fingerprint);
    Ok(fingerprint)
}

pub struct FingerprintHasher {
    inner: Sha256,
    bytes: u64,
}

impl FingerprintHasher {
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
            bytes: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
        self.bytes += data.len() as u64;
    }

    pub fn bytes_hashed(&self) -> u64 {
        self.bytes
    }

    pub fn finalize(self) -> Fingerprint {
        let mut digest = [0u8; FINGERPRINT_SIZE];
        digest.copy_from_slice(&self.inner.finalize());
        Fingerprint::from_bytes(digest)
    }
}

impl Default for FingerprintHasher {
    fn default() -> Self {
        Self::new()
    }
}
