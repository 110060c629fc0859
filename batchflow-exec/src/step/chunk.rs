use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use batchflow_core::{StepContribution, StepExecution};

use super::fault_tolerant::{ItemPolicies, ProcessErrorDecision};
use super::{Step, StepError};
use crate::item::{ItemProcessor, ItemReader, ItemWriter};
use crate::listener::ChunkListeners;

/// Reads, processes and writes items in chunks of at most `chunk_size`.
///
/// Each output item that survives processing is buffered; a full buffer is
/// written in one call and counts as one commit. A final partial buffer is
/// written once the reader is exhausted. Any failure stops the step.
pub struct ChunkOrientedStep<I, O> {
    pub(crate) name: String,
    pub(crate) chunk_size: usize,
    pub(crate) reader: Arc<dyn ItemReader<I>>,
    pub(crate) processor: Option<Arc<dyn ItemProcessor<I, O>>>,
    pub(crate) writer: Arc<dyn ItemWriter<O>>,
    pub(crate) listeners: ChunkListeners<I, O>,
}

impl<I, O> ChunkOrientedStep<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub(crate) async fn run(
        &self,
        step_execution: &mut StepExecution,
        policies: &ItemPolicies,
    ) -> Result<(), StepError> {
        self.listeners.before_step(step_execution);
        let mut contribution = StepContribution::new();
        let result = self
            .run_chunks(step_execution, &mut contribution, policies)
            .await;
        step_execution.apply(&contribution);
        self.listeners.after_step(step_execution);
        result
    }

    async fn run_chunks(
        &self,
        step_execution: &mut StepExecution,
        contribution: &mut StepContribution,
        policies: &ItemPolicies,
    ) -> Result<(), StepError> {
        let mut chunk = Vec::with_capacity(self.chunk_size);
        while let Some(item) = self.read_item(contribution).await? {
            if let Some(output) = self.process_item(item, contribution, policies).await? {
                chunk.push(output);
            }
            if chunk.len() >= self.chunk_size {
                self.write_chunk(&chunk, contribution, step_execution).await?;
                chunk.clear();
            }
        }
        if !chunk.is_empty() {
            self.write_chunk(&chunk, contribution, step_execution).await?;
        }
        Ok(())
    }

    async fn read_item(&self, contribution: &mut StepContribution) -> Result<Option<I>, StepError> {
        self.listeners.before_read();
        match self.reader.read().await {
            Ok(Some(item)) => {
                contribution.increment_read_count();
                self.listeners.after_read(&item);
                Ok(Some(item))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.listeners.on_read_error(&e);
                Err(StepError::Read(e))
            }
        }
    }

    /// Runs the processor, consulting `policies` after each failed attempt.
    /// `Ok(None)` means the item was filtered or skipped.
    async fn process_item(
        &self,
        item: I,
        contribution: &mut StepContribution,
        policies: &ItemPolicies,
    ) -> Result<Option<O>, StepError> {
        let Some(processor) = &self.processor else {
            return pass_through(item).map(Some);
        };

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.listeners.before_process(&item);
            let error = match processor.process(&item).await {
                Ok(output) => {
                    if output.is_none() {
                        contribution.increment_filter_count();
                    }
                    self.listeners.after_process(&item, output.as_ref());
                    return Ok(output);
                }
                Err(e) => e,
            };
            self.listeners.on_process_error(&item, &error);

            match policies
                .decide(&self.name, &error, attempt, contribution.skip_count())
                .await?
            {
                ProcessErrorDecision::Retry => continue,
                ProcessErrorDecision::Skip => {
                    contribution.increment_skip_count_in_process();
                    self.listeners.on_skip_in_process(&item, &error);
                    return Ok(None);
                }
                ProcessErrorDecision::Fail => return Err(StepError::Process(error)),
            }
        }
    }

    async fn write_chunk(
        &self,
        items: &[O],
        contribution: &mut StepContribution,
        step_execution: &mut StepExecution,
    ) -> Result<(), StepError> {
        self.listeners.before_chunk();
        self.listeners.before_write(items);
        match self.writer.write(items).await {
            Ok(()) => {
                self.listeners.after_write(items);
                contribution.increment_write_count(items.len() as u64);
                step_execution.increment_commit_count();
                self.listeners.after_chunk();
                debug!(step = %self.name, items = items.len(), "chunk committed");
                Ok(())
            }
            Err(e) => {
                self.listeners.on_write_error(items, &e);
                self.listeners.after_chunk_error(&e);
                step_execution.increment_rollback_count();
                Err(StepError::Write(e))
            }
        }
    }
}

/// Forwards an item unchanged when no processor is configured. The builder
/// only allows this when the input and output types are the same.
fn pass_through<I: 'static, O: 'static>(item: I) -> Result<O, StepError> {
    let boxed: Box<dyn Any> = Box::new(item);
    boxed.downcast::<O>().map(|output| *output).map_err(|_| {
        StepError::Process(anyhow::anyhow!(
            "cannot pass {} through as {} without a processor",
            std::any::type_name::<I>(),
            std::any::type_name::<O>()
        ))
    })
}

#[async_trait]
impl<I, O> Step for ChunkOrientedStep<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, step_execution: &mut StepExecution) -> Result<(), StepError> {
        self.run(step_execution, &ItemPolicies::none()).await
    }
}
