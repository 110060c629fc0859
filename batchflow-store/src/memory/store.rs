use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use batchflow_core::{JobExecution, JobInstance, JobParameters, StepExecution};
use parking_lot::RwLock;

use crate::store::{JobRepository, RepositoryError};

/// Process-local repository. Everything is lost when it is dropped.
///
/// Stores detached copies of every record, execution contexts included, so
/// `update_*` calls are real writes: a caller that never calls them will not
/// see its changes here. Reads hand back detached copies too.
pub struct InMemoryJobRepository {
    instance_ids: AtomicI64,
    execution_ids: AtomicI64,
    step_execution_ids: AtomicI64,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    instances: HashMap<i64, JobInstance>,
    executions: HashMap<i64, JobExecution>,
}

impl Default for InMemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self {
            instance_ids: AtomicI64::new(1),
            execution_ids: AtomicI64::new(1),
            step_execution_ids: AtomicI64::new(1),
            state: RwLock::new(State::default()),
        }
    }

    pub fn job_execution_count(&self) -> usize {
        self.state.read().executions.len()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create_job_instance(
        &self,
        job_name: &str,
        _job_parameters: &JobParameters,
    ) -> Result<JobInstance, RepositoryError> {
        let instance = JobInstance::new(self.instance_ids.fetch_add(1, Ordering::SeqCst), job_name);
        self.state
            .write()
            .instances
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn create_job_execution(
        &self,
        job_instance: JobInstance,
        job_parameters: JobParameters,
    ) -> Result<JobExecution, RepositoryError> {
        let id = self.execution_ids.fetch_add(1, Ordering::SeqCst);
        let execution = JobExecution::new(id, job_instance, job_parameters);
        self.state.write().executions.insert(id, execution.detached());
        tracing::debug!(job_execution_id = id, "created job execution");
        Ok(execution)
    }

    async fn create_step_execution<'a>(
        &self,
        job_execution: &'a mut JobExecution,
        step_name: &str,
    ) -> Result<&'a mut StepExecution, RepositoryError> {
        let job_execution_id = job_execution.id();
        let id = self.step_execution_ids.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.state.write();
            let stored = state
                .executions
                .get_mut(&job_execution_id)
                .ok_or(RepositoryError::JobExecutionNotFound(job_execution_id))?;
            stored.add_step_execution(id, step_name);
        }
        Ok(job_execution.add_step_execution(id, step_name))
    }

    async fn update_job_execution(&self, job_execution: &JobExecution) -> Result<(), RepositoryError> {
        self.state
            .write()
            .executions
            .insert(job_execution.id(), job_execution.detached());
        Ok(())
    }

    async fn update_step_execution(
        &self,
        step_execution: &StepExecution,
    ) -> Result<(), RepositoryError> {
        let job_execution_id = step_execution.job_execution_id();
        let mut state = self.state.write();
        let stored = state
            .executions
            .get_mut(&job_execution_id)
            .ok_or(RepositoryError::JobExecutionNotFound(job_execution_id))?;
        let slot = stored.step_execution_mut(step_execution.id()).ok_or(
            RepositoryError::StepExecutionNotFound {
                job_execution_id,
                step_execution_id: step_execution.id(),
            },
        )?;
        *slot = step_execution.detached();
        Ok(())
    }

    async fn get_job_instance(&self, id: i64) -> Result<Option<JobInstance>, RepositoryError> {
        Ok(self.state.read().instances.get(&id).cloned())
    }

    async fn get_job_execution(&self, id: i64) -> Result<Option<JobExecution>, RepositoryError> {
        Ok(self
            .state
            .read()
            .executions
            .get(&id)
            .map(JobExecution::detached))
    }

    async fn list_job_executions(&self, job_name: &str) -> Result<Vec<JobExecution>, RepositoryError> {
        let mut executions: Vec<JobExecution> = self
            .state
            .read()
            .executions
            .values()
            .filter(|e| e.job_name() == job_name)
            .map(JobExecution::detached)
            .collect();
        executions.sort_by_key(JobExecution::id);
        Ok(executions)
    }
}
