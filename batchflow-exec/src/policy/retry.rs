use super::classify::ErrorClassifier;

/// Decides whether a failed processing attempt is tried again.
pub trait RetryPolicy: Send + Sync {
    /// `attempt` is the 1-based number of the attempt that just failed.
    fn should_retry(&self, error: &anyhow::Error, attempt: u32) -> bool;
}

/// Retries up to `max_attempts` total attempts, optionally restricted to a
/// set of error kinds.
#[derive(Debug)]
pub struct SimpleRetryPolicy {
    max_attempts: u32,
    retryable: ErrorClassifier,
}

impl SimpleRetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            retryable: ErrorClassifier::new(),
        }
    }

    /// Restrict retries to errors of type `E`. May be called repeatedly.
    pub fn retry_on<E>(mut self) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.retryable.add::<E>();
        self
    }

    pub fn retry_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
    {
        self.retryable.add_predicate(predicate);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl RetryPolicy for SimpleRetryPolicy {
    fn should_retry(&self, error: &anyhow::Error, attempt: u32) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        self.retryable.matches(error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRetryPolicy;

impl RetryPolicy for NeverRetryPolicy {
    fn should_retry(&self, _error: &anyhow::Error, _attempt: u32) -> bool {
        false
    }
}
