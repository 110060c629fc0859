#![forbid(unsafe_code)]

//! Execution model for batchflow jobs.
//!
//! These are passive records: the executor in `batchflow-exec` mutates them,
//! a `batchflow-store` repository persists them.

pub mod params;
pub mod runtime;

pub use crate::params::{JobParameter, JobParameters, JobParametersBuilder};
pub use crate::runtime::{
    BatchStatus, ExecutionContext, ExitStatus, JobExecution, JobInstance, RepeatStatus,
    StepContribution, StepExecution,
};
