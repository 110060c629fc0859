use std::time::Duration;

use async_trait::async_trait;

use super::cancel::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("backoff interrupted by cancellation")]
pub struct BackoffInterrupted;

/// Pause taken between a failed processing attempt and its retry.
#[async_trait]
pub trait BackoffPolicy: Send + Sync {
    /// `attempt` is the 1-based number of the attempt that just failed.
    async fn backoff(&self, attempt: u32) -> Result<(), BackoffInterrupted>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackoffPolicy;

#[async_trait]
impl BackoffPolicy for NoBackoffPolicy {
    async fn backoff(&self, _attempt: u32) -> Result<(), BackoffInterrupted> {
        Ok(())
    }
}

/// Waits the same interval before every retry.
#[derive(Debug, Clone)]
pub struct FixedBackoffPolicy {
    interval: Duration,
    cancellation: Option<CancellationToken>,
}

impl FixedBackoffPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancellation: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Abort the wait early when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl BackoffPolicy for FixedBackoffPolicy {
    async fn backoff(&self, _attempt: u32) -> Result<(), BackoffInterrupted> {
        sleep_or_cancel(self.interval, self.cancellation.as_ref()).await
    }
}

/// Waits `initial * multiplier^(attempt-1)`, capped at `max_interval`,
/// optionally with full jitter.
#[derive(Debug, Clone)]
pub struct ExponentialBackoffPolicy {
    initial: Duration,
    multiplier: f64,
    max_interval: Duration,
    jitter: bool,
    cancellation: Option<CancellationToken>,
}

impl ExponentialBackoffPolicy {
    pub fn new(initial: Duration, multiplier: f64, max_interval: Duration) -> Self {
        Self {
            initial,
            multiplier,
            max_interval,
            jitter: false,
            cancellation: None,
        }
    }

    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Upper bound of the delay before retrying after `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = (self.initial.as_millis() as f64) * self.multiplier.powi(exp);
        let capped = raw.min(self.max_interval.as_millis() as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}

#[async_trait]
impl BackoffPolicy for ExponentialBackoffPolicy {
    async fn backoff(&self, attempt: u32) -> Result<(), BackoffInterrupted> {
        let ceiling = self.delay_for(attempt);
        let delay = if self.jitter {
            let ms = ceiling.as_millis() as u64;
            Duration::from_millis(if ms == 0 { 0 } else { fastrand::u64(0..=ms) })
        } else {
            ceiling
        };
        sleep_or_cancel(delay, self.cancellation.as_ref()).await
    }
}

async fn sleep_or_cancel(
    delay: Duration,
    cancellation: Option<&CancellationToken>,
) -> Result<(), BackoffInterrupted> {
    let Some(token) = cancellation else {
        tokio::time::sleep(delay).await;
        return Ok(());
    };
    if token.is_cancelled() {
        return Err(BackoffInterrupted);
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = token.cancelled() => Err(BackoffInterrupted),
    }
}
