use docverify_types::{DocverifyError, DocverifyResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub struct BackoffStrategy {
    base_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    current_delay: Duration,
    attempt: u32,
    max_attempts: Option<u32>,
    jitter: bool,
}

impl BackoffStrategy {
    pub fn exponential(base: Duration, max: Duration) -> Self {
        Self {
            base_delay: base,
            max_delay: max,
            multiplier: 2.0,
            current_delay: base,
            attempt: 0,
            max_attempts: None,
            jitter: true,
        }
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = Some(max);
        self
    }

    pub fn with_jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }

    pub fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if self.attempt >= max {
                return None;
            }
        }

        self.attempt += 1;

        let delay = if self.attempt == 1 {
            self.base_delay
        } else {
            let multiplied = self.current_delay.as_secs_f64() * self.multiplier;
            let capped = multiplied.min(self.max_delay.as_secs_f64());
            Duration::from_secs_f64(capped)
        };

        self.current_delay = delay;

        let final_delay = if self.jitter {
            let jitter_factor = 0.5 + rand::random::<f64>() * 0.5;
            Duration::from_secs_f64(delay.as_secs_f64() * jitter_factor)
        } else {
            delay
        };

        Some(final_delay)
    }

    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_attempts.map_or(false, |max| self.attempt >= max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub read_retries: u32,
    pub write_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            read_retries: 3,
            write_retries: 0,
            base_delay_ms: 250,
            max_delay_ms: 4_000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            read_retries: 0,
            write_retries: 0,
            ..Default::default()
        }
    }

    pub fn immediate(read_retries: u32) -> Self {
        Self {
            read_retries,
            write_retries: 0,
            base_delay_ms: 0,
            max_delay_ms: 0,
            jitter: false,
        }
    }

    fn strategy(&self, retries: u32) -> BackoffStrategy {
        BackoffStrategy::exponential(
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
        .with_max_attempts(retries)
        .with_jitter(self.jitter)
    }

    pub fn read_backoff(&self) -> BackoffStrategy {
        self.strategy(self.read_retries)
    }

    pub fn write_backoff(&self) -> BackoffStrategy {
        self.strategy(self.write_retries)
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// backoff is exhausted.
pub async fn with_retry<T, F, Fut>(what: &str, mut backoff: BackoffStrategy, mut op: F) -> DocverifyResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DocverifyResult<T>>,
{
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => match backoff.next_delay() {
                Some(delay) => {
                    warn!(
                        "{} failed ({}), retry {} in {:?}",
                        what,
                        e,
                        backoff.attempts(),
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }
}

pub async fn with_timeout<T, Fut>(what: &str, limit: Duration, fut: Fut) -> DocverifyResult<T>
where
    Fut: Future<Output = DocverifyResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DocverifyError::NetworkFailure(format!("{} timed out after {:?}", what, limit)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_strategy() {
        let mut backoff = BackoffStrategy::exponential(Duration::from_millis(100), Duration::from_secs(1))
            .with_max_attempts(4)
            .with_jitter(false);

        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(800)));
        assert!(backoff.is_exhausted());
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_backoff_caps_at_max() {
        let mut backoff = BackoffStrategy::exponential(Duration::from_millis(600), Duration::from_secs(1))
            .with_jitter(false);
        backoff.next_delay();
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_retries_network_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry("verify", RetryPolicy::immediate(3).read_backoff(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(DocverifyError::NetworkFailure("connection reset".into()))
            } else {
                Ok(true)
            }
        })
        .await;

        assert!(result.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_errors_not_retried() {
        let calls = AtomicU32::new(0);
        let result: DocverifyResult<()> = with_retry("add", RetryPolicy::immediate(5).read_backoff(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DocverifyError::RejectedByRegistry("duplicate".into()))
        })
        .await;

        assert!(matches!(result, Err(DocverifyError::RejectedByRegistry(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: DocverifyResult<()> = with_retry("verify", RetryPolicy::immediate(2).read_backoff(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DocverifyError::NetworkFailure("down".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_network_failure() {
        let result: DocverifyResult<()> = with_timeout("verify", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(DocverifyError::NetworkFailure(_))));
    }
}
