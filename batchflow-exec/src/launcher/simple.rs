use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use batchflow_core::{BatchStatus, ExitStatus, JobExecution, JobParameters, StepExecution};
use batchflow_store::JobRepository;

use super::{JobLauncher, LaunchError};
use crate::flow::{Flow, FlowExecutor};
use crate::job::{Job, JobStep};
use crate::step::{Step, StepError};

/// Runs jobs on the calling task and records them in a [`JobRepository`].
#[derive(Clone)]
pub struct SimpleJobLauncher {
    repository: Arc<dyn JobRepository>,
}

impl SimpleJobLauncher {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn JobRepository> {
        &self.repository
    }

    /// Runs every entry in order. Returns the combined exit status of the
    /// flows that ran, or the first top-level step failure.
    async fn run_steps(
        &self,
        job: &Job,
        execution: &mut JobExecution,
    ) -> Result<ExitStatus, LaunchError> {
        let mut exit_status = ExitStatus::COMPLETED;
        for job_step in job.steps() {
            match job_step {
                JobStep::Step(step) => self.run_step(step.as_ref(), execution).await?,
                JobStep::Flow(flow) => {
                    let flow_status = self.run_flow(flow.as_ref(), execution).await;
                    exit_status = exit_status.and(&flow_status);
                }
            }
        }
        Ok(exit_status)
    }

    async fn run_step(&self, step: &dyn Step, execution: &mut JobExecution) -> Result<(), LaunchError> {
        let job_execution_id = execution.id();
        let step_execution = self
            .repository
            .create_step_execution(execution, step.name())
            .await?;
        let result = execute_tracked(step, step_execution).await;
        let persisted = self.repository.update_step_execution(step_execution).await;
        match result {
            Ok(()) => {
                persisted?;
                Ok(())
            }
            Err(source) => {
                if let Err(e) = persisted {
                    warn!(step = step.name(), error = %e, "failed to persist failed step execution");
                }
                Err(LaunchError::Step {
                    job_execution_id,
                    step_name: step.name().to_string(),
                    source,
                })
            }
        }
    }

    async fn run_flow(&self, flow: &dyn Flow, execution: &mut JobExecution) -> ExitStatus {
        info!(flow = flow.name(), "executing flow");
        let mut executor = RecordingFlowExecutor {
            repository: self.repository.as_ref(),
            execution,
        };
        let exit_status = flow.execute(&mut executor).await;
        info!(flow = flow.name(), exit_code = exit_status.exit_code(), "flow finished");
        exit_status
    }
}

#[async_trait]
impl JobLauncher for SimpleJobLauncher {
    async fn run(
        &self,
        job: &Job,
        job_parameters: JobParameters,
    ) -> Result<JobExecution, LaunchError> {
        let instance = self
            .repository
            .create_job_instance(job.name(), &job_parameters)
            .await?;
        let mut execution = self
            .repository
            .create_job_execution(instance, job_parameters)
            .await?;

        execution.set_status(BatchStatus::Started);
        execution.set_start_time(Utc::now());
        let started = self.repository.update_job_execution(&execution).await;

        for l in job.listeners() {
            l.before_job(&execution);
        }

        // Steps only run once the started record is stored.
        let outcome = match started {
            Ok(()) => {
                info!(job = job.name(), job_execution_id = execution.id(), "job started");
                self.run_steps(job, &mut execution).await
            }
            Err(e) => Err(LaunchError::from(e)),
        };
        match &outcome {
            Ok(exit_status) => {
                let status = if exit_status.is_failed() {
                    BatchStatus::Failed
                } else {
                    BatchStatus::Completed
                };
                execution.set_status(status);
                execution.set_exit_status(exit_status.clone());
            }
            Err(e) => {
                execution.set_status(BatchStatus::Failed);
                execution.set_exit_status(ExitStatus::FAILED.with_description(e.to_string()));
            }
        }

        for l in job.listeners() {
            l.after_job(&execution);
        }
        execution.set_end_time(Utc::now());
        let persisted = self.repository.update_job_execution(&execution).await;

        info!(
            job = job.name(),
            job_execution_id = execution.id(),
            status = execution.status().as_str(),
            exit_code = execution.exit_status().exit_code(),
            "job finished"
        );

        match outcome {
            Ok(_) => {
                persisted?;
                Ok(execution)
            }
            Err(e) => {
                if let Err(persist_error) = persisted {
                    warn!(job = job.name(), error = %persist_error, "failed to persist failed job execution");
                }
                Err(e)
            }
        }
    }
}

/// Marks the step started, runs it and records how it ended.
///
/// A successful step keeps the exit status it reported unless it never
/// reported one or reported `FAILED`; both become `COMPLETED`. A failed step
/// always ends with `FAILED`.
async fn execute_tracked(step: &dyn Step, step_execution: &mut StepExecution) -> Result<(), StepError> {
    info!(step = step.name(), step_execution_id = step_execution.id(), "executing step");
    step_execution.set_start_time(Utc::now());
    step_execution.set_status(BatchStatus::Started);

    let result = step.execute(step_execution).await;
    match &result {
        Ok(()) => {
            step_execution.set_status(BatchStatus::Completed);
            let reported = step_execution.exit_status();
            if *reported == ExitStatus::UNKNOWN || reported.is_failed() {
                step_execution.set_exit_status(ExitStatus::COMPLETED);
            }
        }
        Err(e) => {
            step_execution.set_status(BatchStatus::Failed);
            step_execution.set_exit_status(ExitStatus::FAILED.with_description(e.to_string()));
            warn!(step = step.name(), kind = e.as_str(), error = %e, "step failed");
        }
    }
    step_execution.set_end_time(Utc::now());

    info!(
        step = step.name(),
        status = step_execution.status().as_str(),
        read = step_execution.read_count(),
        written = step_execution.write_count(),
        filtered = step_execution.filter_count(),
        skipped = step_execution.skip_count(),
        commits = step_execution.commit_count(),
        "step finished"
    );
    result
}

/// Records each flow step as a step execution of the running job.
/// Step failures become a `FAILED` exit status so the flow can route on them.
struct RecordingFlowExecutor<'a> {
    repository: &'a dyn JobRepository,
    execution: &'a mut JobExecution,
}

#[async_trait]
impl<'a> FlowExecutor for RecordingFlowExecutor<'a> {
    async fn execute_step(&mut self, step: &Arc<dyn Step>) -> Result<ExitStatus, anyhow::Error> {
        let step_execution = self
            .repository
            .create_step_execution(&mut *self.execution, step.name())
            .await?;
        // Failure is already captured in the step execution's exit status.
        let _ = execute_tracked(step.as_ref(), step_execution).await;
        self.repository.update_step_execution(step_execution).await?;
        Ok(step_execution.exit_status().clone())
    }
}
