//! Item-level contracts: where items come from, how they are transformed and
//! where they go.

mod adapters;
mod iter;

use async_trait::async_trait;

use batchflow_core::{ExecutionContext, RepeatStatus, StepContribution};

pub use adapters::{
    processor_fn, reader_fn, tasklet_fn, writer_fn, FnItemProcessor, FnItemReader,
    FnItemWriter, FnTasklet,
};
pub use iter::{IteratorItemReader, VecItemWriter};

/// Source of items for a chunk step.
///
/// `Ok(None)` signals that the input is exhausted.
#[async_trait]
pub trait ItemReader<T>: Send + Sync {
    async fn read(&self) -> Result<Option<T>, anyhow::Error>;
}

/// Transforms one input item into zero or one output item.
///
/// Returning `Ok(None)` filters the item: it is counted but never written.
#[async_trait]
pub trait ItemProcessor<I, O>: Send + Sync {
    async fn process(&self, item: &I) -> Result<Option<O>, anyhow::Error>;
}

/// Writes a whole chunk of output items at once.
#[async_trait]
pub trait ItemWriter<O>: Send + Sync {
    async fn write(&self, items: &[O]) -> Result<(), anyhow::Error>;
}

/// Single unit of work repeated until it returns [`RepeatStatus::Finished`].
#[async_trait]
pub trait Tasklet: Send + Sync {
    async fn execute(
        &self,
        contribution: &mut StepContribution,
        context: &ExecutionContext,
    ) -> Result<RepeatStatus, anyhow::Error>;
}
