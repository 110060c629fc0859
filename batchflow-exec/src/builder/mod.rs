//! Fluent construction of steps, flows and jobs.

mod flow;
mod job;
mod step;

pub use flow::{FlowBuilder, SimpleFlowBuilder, TransitionBuilder};
pub use job::JobBuilder;
pub use step::{ChunkStepBuilder, FaultTolerantChunkStepBuilder, StepBuilder, TaskletStepBuilder};

/// Rejected configuration, reported by `build()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("chunk step '{0}' has no reader")]
    MissingReader(String),
    #[error("chunk step '{0}' has no writer")]
    MissingWriter(String),
    #[error("chunk step '{0}' needs a chunk size of at least 1")]
    InvalidChunkSize(String),
    #[error("chunk step '{step}' needs a processor to turn {input} into {output}")]
    MissingProcessor {
        step: String,
        input: &'static str,
        output: &'static str,
    },
    #[error("job '{0}' has no steps")]
    NoSteps(String),
}
