use serde::Serialize;

use batchflow_core::{JobExecution, StepExecution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_result<T: Serialize>(format: OutputFormat, quiet: bool, result: &T) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{json}");
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(result) {
                println!("{json}");
            }
        }
    }
}

pub fn print_error(format: OutputFormat, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub job_execution_id: i64,
    pub job_name: String,
    pub status: String,
    pub exit_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps: Vec<StepSummary>,
}

#[derive(Debug, Serialize)]
pub struct StepSummary {
    pub name: String,
    pub status: String,
    pub exit_code: String,
    pub read_count: u64,
    pub write_count: u64,
    pub filter_count: u64,
    pub skip_count: u64,
    pub commit_count: u64,
    pub rollback_count: u64,
}

impl RunSummary {
    pub fn new(execution: &JobExecution, error: Option<String>) -> Self {
        Self {
            job_execution_id: execution.id(),
            job_name: execution.job_name().to_string(),
            status: execution.status().as_str().to_string(),
            exit_code: execution.exit_status().exit_code().to_string(),
            error,
            steps: execution.step_executions().iter().map(StepSummary::from).collect(),
        }
    }

    pub fn print(&self, format: OutputFormat, quiet: bool) {
        if format == OutputFormat::Json || quiet {
            print_result(format, quiet, self);
            return;
        }
        println!(
            "job {} (execution {}): {}",
            self.job_name, self.job_execution_id, self.status
        );
        for s in &self.steps {
            println!(
                "  step {}: {} read={} written={} filtered={} skipped={} commits={} rollbacks={}",
                s.name,
                s.status,
                s.read_count,
                s.write_count,
                s.filter_count,
                s.skip_count,
                s.commit_count,
                s.rollback_count
            );
        }
    }
}

impl From<&StepExecution> for StepSummary {
    fn from(s: &StepExecution) -> Self {
        Self {
            name: s.step_name().to_string(),
            status: s.status().as_str().to_string(),
            exit_code: s.exit_status().exit_code().to_string(),
            read_count: s.read_count(),
            write_count: s.write_count(),
            filter_count: s.filter_count(),
            skip_count: s.skip_count(),
            commit_count: s.commit_count(),
            rollback_count: s.rollback_count(),
        }
    }
}
