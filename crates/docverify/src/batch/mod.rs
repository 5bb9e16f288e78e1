mod job;
mod verifier;

pub use job::{BatchEntry, BatchJob, BatchSource};
pub use verifier::{BatchReport, BatchVerifier, CANCELLED_MESSAGE, DEFAULT_CONCURRENCY, MAX_CONCURRENCY};

#[cfg(test)]
mod tests;
