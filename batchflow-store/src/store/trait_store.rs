use async_trait::async_trait;
use batchflow_core::{JobExecution, JobInstance, JobParameters, StepExecution};

/// Persistence boundary for execution metadata.
///
/// Implementations allocate identifiers and keep a durable copy of every
/// execution record. The launcher is the only writer.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job_instance(
        &self,
        job_name: &str,
        job_parameters: &JobParameters,
    ) -> Result<JobInstance, RepositoryError>;

    async fn create_job_execution(
        &self,
        job_instance: JobInstance,
        job_parameters: JobParameters,
    ) -> Result<JobExecution, RepositoryError>;

    /// Allocates a step execution, appends it to `job_execution` and returns it.
    async fn create_step_execution<'a>(
        &self,
        job_execution: &'a mut JobExecution,
        step_name: &str,
    ) -> Result<&'a mut StepExecution, RepositoryError>;

    async fn update_job_execution(&self, job_execution: &JobExecution) -> Result<(), RepositoryError>;

    async fn update_step_execution(
        &self,
        step_execution: &StepExecution,
    ) -> Result<(), RepositoryError>;

    async fn get_job_instance(&self, id: i64) -> Result<Option<JobInstance>, RepositoryError>;

    async fn get_job_execution(&self, id: i64) -> Result<Option<JobExecution>, RepositoryError>;

    /// Executions of every instance of `job_name`, oldest first.
    async fn list_job_executions(&self, job_name: &str) -> Result<Vec<JobExecution>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job execution not found: {0}")]
    JobExecutionNotFound(i64),
    #[error("step execution {step_execution_id} not found in job execution {job_execution_id}")]
    StepExecutionNotFound {
        job_execution_id: i64,
        step_execution_id: i64,
    },
    #[error("repository error: {0}")]
    Other(String),
}
