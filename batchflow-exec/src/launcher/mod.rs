//! Running jobs and recording their executions.

mod simple;

use async_trait::async_trait;

use batchflow_core::{JobExecution, JobParameters};
use batchflow_store::RepositoryError;

use crate::job::Job;
use crate::step::StepError;

pub use simple::SimpleJobLauncher;

#[async_trait]
pub trait JobLauncher: Send + Sync {
    /// Runs `job` once with `job_parameters`.
    ///
    /// Returns the finished execution, or the first top-level step failure
    /// after the execution has been marked failed and persisted.
    async fn run(
        &self,
        job: &Job,
        job_parameters: JobParameters,
    ) -> Result<JobExecution, LaunchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("step '{step_name}' failed in job execution {job_execution_id}: {source}")]
    Step {
        job_execution_id: i64,
        step_name: String,
        #[source]
        source: StepError,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LaunchError {
    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            LaunchError::Step { source, .. } => Some(source),
            LaunchError::Repository(_) => None,
        }
    }

    pub fn job_execution_id(&self) -> Option<i64> {
        match self {
            LaunchError::Step {
                job_execution_id, ..
            } => Some(*job_execution_id),
            LaunchError::Repository(_) => None,
        }
    }
}
