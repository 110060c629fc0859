mod context;
mod contribution;
mod execution;
mod status;

pub use context::ExecutionContext;
pub use contribution::StepContribution;
pub use execution::{JobExecution, JobInstance, StepExecution};
pub use status::{BatchStatus, ExitStatus, RepeatStatus};
