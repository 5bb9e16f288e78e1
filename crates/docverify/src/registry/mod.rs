mod backend;
mod bindings;
mod client;
mod contract;
#[cfg(any(test, feature = "test-util"))]
mod memory;
mod retry;

pub use backend::Registry;
pub use bindings::DocumentRegistry;
pub use client::{RegistryClient, VerifiedFingerprint, DEFAULT_CALL_TIMEOUT, DEFAULT_CONFIRM_TIMEOUT};
pub use contract::ContractRegistry;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryRegistry;
pub use retry::{with_retry, with_timeout, BackoffStrategy, RetryPolicy};

#[cfg(test)]
mod tests;
