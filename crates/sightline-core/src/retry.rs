//! Retry policies for startup operations.

use std::fmt::Display;
use std::time::Duration;

use tracing::warn;

pub trait RetryStrategy {
    /// Delay before the next attempt after `failures` failed attempts, or
    /// `None` to give up.
    fn next_delay(&self, failures: u32) -> Option<Duration>;
}

/// Wait a fixed delay between attempts, up to `max_retries` retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    pub delay: Duration,
    pub max_retries: u32,
}

impl FixedDelay {
    pub fn new(delay: Duration, max_retries: u32) -> Self {
        Self { delay, max_retries }
    }

    /// One retry after `delay`.
    pub fn once(delay: Duration) -> Self {
        Self::new(delay, 1)
    }
}

impl RetryStrategy for FixedDelay {
    fn next_delay(&self, failures: u32) -> Option<Duration> {
        (failures <= self.max_retries).then_some(self.delay)
    }
}

/// Run `op` until it succeeds or `strategy` gives up.
///
/// Errors for which `retryable` is false are returned immediately. `wait`
/// performs the delay and returns `true` if retrying should stop early
/// (e.g. on shutdown). The last error is returned on give-up.
pub fn retry_with<T, E, S, P, W, F>(
    strategy: &S,
    retryable: P,
    mut wait: W,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    S: RetryStrategy + ?Sized,
    P: Fn(&E) -> bool,
    W: FnMut(Duration) -> bool,
    F: FnMut() -> Result<T, E>,
{
    let mut failures = 0u32;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if !retryable(&e) => return Err(e),
            Err(e) => {
                failures += 1;
                let Some(delay) = strategy.next_delay(failures) else {
                    return Err(e);
                };
                warn!("{}; retrying in {}s", e, delay.as_secs_f32());
                if wait(delay) {
                    return Err(e);
                }
            }
        }
    }
}
