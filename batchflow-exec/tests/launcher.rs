mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use batchflow_core::{BatchStatus, JobExecution, JobInstance, JobParameters, StepExecution};
use batchflow_exec::item::{IteratorItemReader, VecItemWriter};
use batchflow_exec::{
    ConfigError, JobBuilder, JobLauncher, LaunchError, SimpleJobLauncher, StepBuilder, StepError,
};
use batchflow_store::{InMemoryJobRepository, JobRepository, RepositoryError};

use common::{exit_code_step, failing_step, ok_step, BadItem, Recorder};

fn numbers_step(name: &str, items: Vec<i32>, writer: VecItemWriter<i32>) -> Arc<dyn batchflow_exec::Step> {
    StepBuilder::new(name)
        .chunk::<i32, i32>(2)
        .reader(IteratorItemReader::new(items))
        .writer(writer)
        .build()
        .unwrap()
}

#[tokio::test]
async fn two_step_job_completes_and_records_both_steps() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let launcher = SimpleJobLauncher::new(repository.clone());
    let writer = VecItemWriter::new();
    let job = JobBuilder::new("import")
        .start(numbers_step("first", vec![1, 2, 3], writer.clone()))
        .next(numbers_step("second", vec![4, 5], writer.clone()))
        .build()
        .unwrap();

    let execution = launcher.run(&job, JobParameters::empty()).await.unwrap();

    assert_eq!(execution.status(), BatchStatus::Completed);
    assert_eq!(execution.exit_status().exit_code(), "COMPLETED");
    assert!(execution.start_time().is_some());
    assert!(execution.end_time() >= execution.start_time());

    let steps = execution.step_executions();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].step_name(), "first");
    assert_eq!(steps[0].read_count(), 3);
    assert_eq!(steps[0].commit_count(), 2);
    assert_eq!(steps[1].step_name(), "second");
    assert_eq!(steps[1].write_count(), 2);
    assert!(steps.iter().all(|s| s.status() == BatchStatus::Completed));
    assert_eq!(writer.items(), vec![1, 2, 3, 4, 5]);

    let stored = repository.get_job_execution(execution.id()).await.unwrap().unwrap();
    assert_eq!(stored, execution);
}

#[tokio::test]
async fn failing_first_step_stops_job() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let launcher = SimpleJobLauncher::new(repository.clone());
    let writer = VecItemWriter::new();
    let job = JobBuilder::new("broken")
        .start(failing_step("first"))
        .next(numbers_step("second", vec![1], writer.clone()))
        .build()
        .unwrap();

    let err = launcher.run(&job, JobParameters::empty()).await.unwrap_err();
    assert!(matches!(err.step_error(), Some(StepError::Tasklet(_))));
    assert!(err.job_execution_id().is_some());

    let LaunchError::Step {
        job_execution_id,
        step_name,
        source,
    } = err
    else {
        panic!("expected step failure");
    };
    assert_eq!(step_name, "first");
    assert!(matches!(source, StepError::Tasklet(_)));
    assert!(source.cause().unwrap().downcast_ref::<BadItem>().is_some());
    assert_eq!(writer.chunk_count(), 0);

    let stored = repository
        .get_job_execution(job_execution_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), BatchStatus::Failed);
    assert_eq!(stored.exit_status().exit_code(), "FAILED");
    assert!(stored.end_time().is_some());
    assert_eq!(stored.step_executions().len(), 1);
    assert_eq!(stored.step_executions()[0].status(), BatchStatus::Failed);
    assert!(stored.step_executions()[0].end_time().is_some());
}

#[tokio::test]
async fn job_listeners_wrap_the_whole_run() {
    let recorder = Recorder::new();
    let launcher = SimpleJobLauncher::new(Arc::new(InMemoryJobRepository::new()));
    let job = JobBuilder::new("observed")
        .start(failing_step("only"))
        .listener(recorder.clone())
        .build()
        .unwrap();

    launcher.run(&job, JobParameters::empty()).await.unwrap_err();

    assert_eq!(recorder.events(), vec!["before_job(STARTED)", "after_job(FAILED)"]);
}

#[tokio::test]
async fn each_run_gets_new_instance_and_execution() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let launcher = SimpleJobLauncher::new(repository.clone());
    let job = JobBuilder::new("repeat").start(ok_step("noop")).build().unwrap();

    let params = JobParameters::builder().add_long("run.id", 1).to_job_parameters();
    let first = launcher.run(&job, params.clone()).await.unwrap();
    let second = launcher
        .run(&job, JobParameters::builder().add_long("run.id", 2).to_job_parameters())
        .await
        .unwrap();

    assert!(second.id() > first.id());
    assert!(second.job_instance().id > first.job_instance().id);
    assert_eq!(first.job_parameters(), &params);
    assert_eq!(second.job_parameters().get_long("run.id"), Some(2));

    let listed = repository.list_job_executions("repeat").await.unwrap();
    assert_eq!(listed.iter().map(|e| e.id()).collect::<Vec<_>>(), vec![first.id(), second.id()]);
}

#[test]
fn job_without_steps_is_rejected() {
    let err = JobBuilder::new("empty").build().unwrap_err();
    assert_eq!(err, ConfigError::NoSteps("empty".to_string()));
}

#[tokio::test]
async fn failed_exit_code_from_successful_step_is_completed() {
    let launcher = SimpleJobLauncher::new(Arc::new(InMemoryJobRepository::new()));
    let job = JobBuilder::new("mislabelled")
        .start(exit_code_step("claims-failure", "FAILED"))
        .build()
        .unwrap();

    let execution = launcher.run(&job, JobParameters::empty()).await.unwrap();

    let step = &execution.step_executions()[0];
    assert_eq!(step.status(), BatchStatus::Completed);
    assert_eq!(step.exit_status().exit_code(), "COMPLETED");
    assert_eq!(execution.status(), BatchStatus::Completed);
}

/// Delegates to an in-memory store but rejects the first job update.
struct RejectFirstUpdate {
    inner: InMemoryJobRepository,
    rejected: AtomicBool,
}

#[async_trait]
impl JobRepository for RejectFirstUpdate {
    async fn create_job_instance(
        &self,
        job_name: &str,
        job_parameters: &JobParameters,
    ) -> Result<JobInstance, RepositoryError> {
        self.inner.create_job_instance(job_name, job_parameters).await
    }

    async fn create_job_execution(
        &self,
        job_instance: JobInstance,
        job_parameters: JobParameters,
    ) -> Result<JobExecution, RepositoryError> {
        self.inner.create_job_execution(job_instance, job_parameters).await
    }

    async fn create_step_execution<'a>(
        &self,
        job_execution: &'a mut JobExecution,
        step_name: &str,
    ) -> Result<&'a mut StepExecution, RepositoryError> {
        self.inner.create_step_execution(job_execution, step_name).await
    }

    async fn update_job_execution(&self, job_execution: &JobExecution) -> Result<(), RepositoryError> {
        if !self.rejected.swap(true, Ordering::SeqCst) {
            return Err(RepositoryError::Other("store offline".to_string()));
        }
        self.inner.update_job_execution(job_execution).await
    }

    async fn update_step_execution(
        &self,
        step_execution: &StepExecution,
    ) -> Result<(), RepositoryError> {
        self.inner.update_step_execution(step_execution).await
    }

    async fn get_job_instance(&self, id: i64) -> Result<Option<JobInstance>, RepositoryError> {
        self.inner.get_job_instance(id).await
    }

    async fn get_job_execution(&self, id: i64) -> Result<Option<JobExecution>, RepositoryError> {
        self.inner.get_job_execution(id).await
    }

    async fn list_job_executions(&self, job_name: &str) -> Result<Vec<JobExecution>, RepositoryError> {
        self.inner.list_job_executions(job_name).await
    }
}

#[tokio::test]
async fn failed_start_update_still_finishes_the_execution() {
    let repository = Arc::new(RejectFirstUpdate {
        inner: InMemoryJobRepository::new(),
        rejected: AtomicBool::new(false),
    });
    let launcher = SimpleJobLauncher::new(repository.clone());
    let recorder = Recorder::new();
    let writer = VecItemWriter::new();
    let job = JobBuilder::new("offline")
        .start(numbers_step("never", vec![1], writer.clone()))
        .listener(recorder.clone())
        .build()
        .unwrap();

    let err = launcher.run(&job, JobParameters::empty()).await.unwrap_err();

    assert!(matches!(err, LaunchError::Repository(RepositoryError::Other(_))));
    assert!(err.step_error().is_none());
    assert_eq!(writer.chunk_count(), 0);
    assert_eq!(recorder.events(), vec!["before_job(STARTED)", "after_job(FAILED)"]);

    let stored = repository.list_job_executions("offline").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status(), BatchStatus::Failed);
    assert_eq!(stored[0].exit_status().exit_code(), "FAILED");
    assert!(stored[0].end_time().is_some());
    assert!(stored[0].step_executions().is_empty());
}
