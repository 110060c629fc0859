use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::params::JobParameters;
use crate::runtime::context::ExecutionContext;
use crate::runtime::contribution::StepContribution;
use crate::runtime::status::{BatchStatus, ExitStatus};

/// Identity of one logical job run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobInstance {
    pub id: i64,
    pub job_name: String,
}

impl JobInstance {
    pub fn new(id: i64, job_name: impl Into<String>) -> Self {
        Self {
            id,
            job_name: job_name.into(),
        }
    }
}

/// One attempt at running a [`JobInstance`].
///
/// Owns its step executions; the list only ever grows, in the order the
/// steps were started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobExecution {
    id: i64,
    job_instance: JobInstance,
    job_parameters: JobParameters,
    status: BatchStatus,
    exit_status: ExitStatus,
    create_time: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    execution_context: ExecutionContext,
    step_executions: Vec<StepExecution>,
}

impl JobExecution {
    pub fn new(id: i64, job_instance: JobInstance, job_parameters: JobParameters) -> Self {
        Self {
            id,
            job_instance,
            job_parameters,
            status: BatchStatus::Starting,
            exit_status: ExitStatus::UNKNOWN,
            create_time: Utc::now(),
            start_time: None,
            end_time: None,
            execution_context: ExecutionContext::new(),
            step_executions: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn job_instance(&self) -> &JobInstance {
        &self.job_instance
    }

    pub fn job_name(&self) -> &str {
        &self.job_instance.job_name
    }

    pub fn job_parameters(&self) -> &JobParameters {
        &self.job_parameters
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn set_status(&mut self, status: BatchStatus) {
        self.status = status;
    }

    pub fn exit_status(&self) -> &ExitStatus {
        &self.exit_status
    }

    pub fn set_exit_status(&mut self, exit_status: ExitStatus) {
        self.exit_status = exit_status;
    }

    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) {
        self.start_time = Some(start_time);
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn set_end_time(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
    }

    pub fn execution_context(&self) -> &ExecutionContext {
        &self.execution_context
    }

    pub fn step_executions(&self) -> &[StepExecution] {
        &self.step_executions
    }

    /// Appends a new step execution and hands it back for the caller to run.
    pub fn add_step_execution(&mut self, id: i64, step_name: impl Into<String>) -> &mut StepExecution {
        let step_execution = StepExecution::new(id, step_name, self.id);
        self.step_executions.push(step_execution);
        let last = self.step_executions.len() - 1;
        &mut self.step_executions[last]
    }

    pub fn step_execution(&self, id: i64) -> Option<&StepExecution> {
        self.step_executions.iter().find(|s| s.id == id)
    }

    pub fn step_execution_mut(&mut self, id: i64) -> Option<&mut StepExecution> {
        self.step_executions.iter_mut().find(|s| s.id == id)
    }

    pub fn is_running(&self) -> bool {
        self.end_time.is_none() && self.status.is_running()
    }

    /// Deep copy whose execution contexts (its own and every step's) no
    /// longer share storage with `self`.
    pub fn detached(&self) -> JobExecution {
        JobExecution {
            execution_context: self.execution_context.detached(),
            step_executions: self
                .step_executions
                .iter()
                .map(StepExecution::detached)
                .collect(),
            ..self.clone()
        }
    }
}

/// One step's run inside a [`JobExecution`].
///
/// Counters never decrease: they move only through [`StepExecution::apply`]
/// and the commit/rollback increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepExecution {
    id: i64,
    step_name: String,
    job_execution_id: i64,
    status: BatchStatus,
    exit_status: ExitStatus,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    execution_context: ExecutionContext,
    read_count: u64,
    write_count: u64,
    commit_count: u64,
    rollback_count: u64,
    filter_count: u64,
    skip_count: u64,
}

impl StepExecution {
    pub fn new(id: i64, step_name: impl Into<String>, job_execution_id: i64) -> Self {
        Self {
            id,
            step_name: step_name.into(),
            job_execution_id,
            status: BatchStatus::Starting,
            exit_status: ExitStatus::UNKNOWN,
            start_time: None,
            end_time: None,
            execution_context: ExecutionContext::new(),
            read_count: 0,
            write_count: 0,
            commit_count: 0,
            rollback_count: 0,
            filter_count: 0,
            skip_count: 0,
        }
    }

    /// Folds a contribution's counts and exit status into this execution.
    pub fn apply(&mut self, contribution: &StepContribution) {
        self.read_count += contribution.read_count();
        self.write_count += contribution.write_count();
        self.filter_count += contribution.filter_count();
        self.skip_count += contribution.skip_count();
        self.exit_status = contribution.exit_status().clone();
    }

    pub fn increment_commit_count(&mut self) {
        self.commit_count += 1;
    }

    pub fn increment_rollback_count(&mut self) {
        self.rollback_count += 1;
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    /// Id of the owning job execution. A lookup key, not an owner.
    pub fn job_execution_id(&self) -> i64 {
        self.job_execution_id
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn set_status(&mut self, status: BatchStatus) {
        self.status = status;
    }

    pub fn exit_status(&self) -> &ExitStatus {
        &self.exit_status
    }

    pub fn set_exit_status(&mut self, exit_status: ExitStatus) {
        self.exit_status = exit_status;
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) {
        self.start_time = Some(start_time);
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn set_end_time(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
    }

    pub fn execution_context(&self) -> &ExecutionContext {
        &self.execution_context
    }

    /// Copy whose execution context no longer shares storage with `self`.
    pub fn detached(&self) -> StepExecution {
        StepExecution {
            execution_context: self.execution_context.detached(),
            ..self.clone()
        }
    }

    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }

    pub fn rollback_count(&self) -> u64 {
        self.rollback_count
    }

    pub fn filter_count(&self) -> u64 {
        self.filter_count
    }

    pub fn skip_count(&self) -> u64 {
        self.skip_count
    }
}
