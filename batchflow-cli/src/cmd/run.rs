use std::path::Path;
use std::sync::Arc;

use batchflow_core::{BatchStatus, JobParameters};
use batchflow_exec::policy::{FixedBackoffPolicy, SimpleRetryPolicy, SimpleSkipPolicy};
use batchflow_exec::{
    ConfigError, Job, JobBuilder, JobLauncher, LaunchError, SimpleJobLauncher, Step, StepBuilder,
};
use batchflow_store::{InMemoryJobRepository, JobRepository};
use tracing::{error, info};

use crate::config::RunConfig;
use crate::exit_codes;
use crate::output::{print_error, RunSummary};
use crate::person::{
    CsvPersonReader, LoggingPersonWriter, Person, PersonFileError, UppercaseProcessor,
};
use crate::{OutputArgs, RunArgs};

pub const JOB_NAME: &str = "importJob";
pub const STEP_NAME: &str = "importStep";

pub async fn run_cmd(path: &Path, args: RunArgs, output: OutputArgs) -> i32 {
    let config = match RunConfig::resolve(&args) {
        Ok(c) => c,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let reader = match CsvPersonReader::open(path) {
        Ok(r) => r,
        Err(e @ PersonFileError::Read { .. }) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("invalid person file: {e}"));
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let job = match build_import_job(reader, &config) {
        Ok(job) => job,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let run_id = args
        .run_id
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let params = JobParameters::builder()
        .add_string("source", path.display().to_string())
        .add_long("run.id", run_id)
        .to_job_parameters();

    let repository = Arc::new(InMemoryJobRepository::new());
    let launcher = SimpleJobLauncher::new(repository.clone());
    info!(job = JOB_NAME, ?config, "launching");

    match launcher.run(&job, params).await {
        Ok(execution) => {
            RunSummary::new(&execution, None).print(output.format, output.quiet);
            if execution.status() == BatchStatus::Completed {
                exit_codes::SUCCESS
            } else {
                exit_codes::RUN_FAILED
            }
        }
        Err(e @ LaunchError::Step { .. }) => {
            error!(error = %e, "job failed");
            let message = e.to_string();
            if let Some(id) = e.job_execution_id() {
                if let Ok(Some(execution)) = repository.get_job_execution(id).await {
                    RunSummary::new(&execution, Some(message.clone()))
                        .print(output.format, output.quiet);
                }
            }
            print_error(output.format, output.quiet, &message);
            exit_codes::RUN_FAILED
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
    }
}

pub fn build_import_job(reader: CsvPersonReader, config: &RunConfig) -> Result<Job, ConfigError> {
    let chunk = StepBuilder::new(STEP_NAME)
        .chunk::<Person, Person>(config.chunk_size)
        .reader(reader)
        .processor(UppercaseProcessor)
        .writer(LoggingPersonWriter);

    let step: Arc<dyn Step> = if config.is_fault_tolerant() {
        let mut ft = chunk
            .fault_tolerant()
            .skip_policy(SimpleSkipPolicy::new(config.skip_limit));
        if config.retry_attempts > 1 {
            ft = ft.retry_policy(SimpleRetryPolicy::new(config.retry_attempts));
            if config.backoff_ms > 0 {
                ft = ft.backoff_policy(FixedBackoffPolicy::from_millis(config.backoff_ms));
            }
        }
        ft.build()?
    } else {
        chunk.build()?
    };

    JobBuilder::new(JOB_NAME).start(step).build()
}
