//! Step strategies.

mod chunk;
mod fault_tolerant;
mod tasklet;

use async_trait::async_trait;

use batchflow_core::StepExecution;

use crate::policy::BackoffInterrupted;

pub use chunk::ChunkOrientedStep;
pub use fault_tolerant::FaultTolerantChunkStep;
pub use tasklet::TaskletStep;

pub(crate) use fault_tolerant::ItemPolicies;

/// A named unit of a job.
///
/// `execute` folds the step's counts and exit status into `step_execution`
/// even when it fails. Lifecycle status and timestamps are owned by the
/// launcher, which also turns a `FAILED` exit code from a step that returned
/// `Ok` into `COMPLETED`.
#[async_trait]
pub trait Step: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, step_execution: &mut StepExecution) -> Result<(), StepError>;
}

/// Why a step stopped early. The user error that caused it is kept intact.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("failed to read item: {0}")]
    Read(#[source] anyhow::Error),
    #[error("failed to process item: {0}")]
    Process(#[source] anyhow::Error),
    #[error("failed to write chunk: {0}")]
    Write(#[source] anyhow::Error),
    #[error("tasklet failed: {0}")]
    Tasklet(#[source] anyhow::Error),
    #[error("interrupted while waiting to retry")]
    Interrupted(#[from] BackoffInterrupted),
}

impl StepError {
    /// The user-supplied error, if the step failed because of one.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            StepError::Read(e) | StepError::Process(e) | StepError::Write(e) => Some(e),
            StepError::Tasklet(e) => Some(e),
            StepError::Interrupted(_) => None,
        }
    }

    pub fn into_cause(self) -> Option<anyhow::Error> {
        match self {
            StepError::Read(e) | StepError::Process(e) | StepError::Write(e) => Some(e),
            StepError::Tasklet(e) => Some(e),
            StepError::Interrupted(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepError::Read(_) => "read",
            StepError::Process(_) => "process",
            StepError::Write(_) => "write",
            StepError::Tasklet(_) => "tasklet",
            StepError::Interrupted(_) => "interrupted",
        }
    }
}
