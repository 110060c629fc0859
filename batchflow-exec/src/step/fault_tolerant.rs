use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use batchflow_core::StepExecution;

use super::chunk::ChunkOrientedStep;
use super::{Step, StepError};
use crate::policy::{BackoffPolicy, RetryPolicy, SkipPolicy};

/// What to do after a processing attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessErrorDecision {
    Retry,
    Skip,
    Fail,
}

#[derive(Default)]
pub(crate) struct ItemPolicies {
    pub(crate) retry: Option<Arc<dyn RetryPolicy>>,
    pub(crate) skip: Option<Arc<dyn SkipPolicy>>,
    pub(crate) backoff: Option<Arc<dyn BackoffPolicy>>,
}

impl ItemPolicies {
    pub(crate) fn none() -> Self {
        Self::default()
    }

    /// Retry takes precedence over skip. The backoff wait happens here, so a
    /// `Retry` decision means the next attempt may start immediately.
    pub(crate) async fn decide(
        &self,
        step: &str,
        error: &anyhow::Error,
        attempt: u32,
        skip_count: u64,
    ) -> Result<ProcessErrorDecision, StepError> {
        if let Some(retry) = &self.retry {
            if retry.should_retry(error, attempt) {
                debug!(step, attempt, error = %error, "retrying item");
                if let Some(backoff) = &self.backoff {
                    backoff.backoff(attempt).await?;
                }
                return Ok(ProcessErrorDecision::Retry);
            }
        }
        if let Some(skip) = &self.skip {
            if skip.should_skip(error, skip_count) {
                warn!(step, skip_count = skip_count + 1, error = %error, "skipping item");
                return Ok(ProcessErrorDecision::Skip);
            }
        }
        Ok(ProcessErrorDecision::Fail)
    }
}

/// A chunk step whose processing failures may be retried or skipped.
///
/// Reading and writing behave exactly as in [`ChunkOrientedStep`]; only
/// processing consults the retry, backoff and skip policies.
pub struct FaultTolerantChunkStep<I, O> {
    pub(crate) chunk: ChunkOrientedStep<I, O>,
    pub(crate) policies: ItemPolicies,
}

#[async_trait]
impl<I, O> Step for FaultTolerantChunkStep<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.chunk.name
    }

    async fn execute(&self, step_execution: &mut StepExecution) -> Result<(), StepError> {
        self.chunk.run(step_execution, &self.policies).await
    }
}
