//! Retry, skip and backoff policies consulted by fault-tolerant chunk steps.

mod backoff;
mod cancel;
mod classify;
mod retry;
mod skip;

pub use backoff::{
    BackoffInterrupted, BackoffPolicy, ExponentialBackoffPolicy, FixedBackoffPolicy,
    NoBackoffPolicy,
};
pub use cancel::CancellationToken;
pub use classify::ErrorClassifier;
pub use retry::{NeverRetryPolicy, RetryPolicy, SimpleRetryPolicy};
pub use skip::{AlwaysSkipPolicy, NeverSkipPolicy, SimpleSkipPolicy, SkipPolicy};
