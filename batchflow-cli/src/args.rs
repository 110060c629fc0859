use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Pipeline tuning. Unset values fall back to the config file, then to
/// built-in defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    /// JSON or YAML file with `chunk_size`, `skip_limit`, `retry_attempts`, `backoff_ms`.
    #[arg(long, env = "BATCHFLOW_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, env = "BATCHFLOW_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,
    /// Invalid rows tolerated before the run fails.
    #[arg(long, env = "BATCHFLOW_SKIP_LIMIT")]
    pub skip_limit: Option<u64>,
    /// Total processing attempts per row, including the first.
    #[arg(long, env = "BATCHFLOW_RETRY_ATTEMPTS")]
    pub retry_attempts: Option<u32>,
    #[arg(long, env = "BATCHFLOW_BACKOFF_MS")]
    pub backoff_ms: Option<u64>,
    /// Defaults to the current time in milliseconds.
    #[arg(long)]
    pub run_id: Option<i64>,
}
