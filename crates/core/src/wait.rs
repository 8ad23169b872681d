//! Suspend-until-condition primitive.
//!
//! The portal updates its DOM asynchronously after each programmatic action,
//! so every stage waits for specific elements to exist or become interactive
//! rather than assuming immediate availability. All such suspensions go
//! through [`WaitConfig::until`], with one uniform bound per run. Exceeding
//! the bound is terminal for the run, never retried.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{HoursError, Result};

/// Default wait bound for any polled condition.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How often a pending condition is re-probed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Bounded polling configuration, applied uniformly to every wait in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitConfig {
    /// Poll `probe` until it yields a value or the bound is exceeded.
    ///
    /// `condition` is a human-readable description carried into the
    /// [`HoursError::Timeout`] on failure. Probes report "not ready yet" as
    /// `None`; transient driver errors while the page is mid-render are the
    /// probe's job to swallow.
    pub async fn until<T, F, Fut>(&self, condition: &str, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(value) = probe().await {
                return Ok(value);
            }
            if Instant::now() >= deadline {
                return Err(HoursError::Timeout {
                    ms: self.timeout.as_millis() as u64,
                    condition: condition.to_string(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_millis(80),
            poll_interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn returns_value_once_probe_is_ready() {
        let mut calls = 0u32;
        let value = quick()
            .until("counter reaches three", || {
                calls += 1;
                let ready = calls >= 3;
                async move { ready.then_some("done") }
            })
            .await
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn immediate_success_does_not_sleep() {
        let value = quick().until("always ready", || async { Some(7) }).await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn times_out_with_condition_in_error() {
        let err = quick()
            .until::<(), _, _>("element never appears", || async { None })
            .await
            .unwrap_err();
        match err {
            HoursError::Timeout { ms, condition } => {
                assert_eq!(ms, 80);
                assert_eq!(condition, "element never appears");
            }
            other => panic!("expected timeout, got: {other}"),
        }
    }
}
