use std::any::{type_name, TypeId};
use std::sync::Arc;

use crate::item::{ItemProcessor, ItemReader, ItemWriter, Tasklet};
use crate::listener::{
    ChunkListener, ChunkListeners, ItemProcessListener, ItemReadListener, ItemWriteListener,
    SkipListener, StepExecutionListener,
};
use crate::policy::{BackoffPolicy, RetryPolicy, SkipPolicy};
use crate::step::{ChunkOrientedStep, FaultTolerantChunkStep, ItemPolicies, Step, TaskletStep};

use super::ConfigError;

/// Entry point for building a step: pick a strategy with
/// [`chunk`](Self::chunk) or [`tasklet`](Self::tasklet).
#[derive(Debug, Clone)]
pub struct StepBuilder {
    name: String,
}

impl StepBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn chunk<I, O>(self, chunk_size: usize) -> ChunkStepBuilder<I, O>
    where
        I: Send + Sync + 'static,
        O: Send + Sync + 'static,
    {
        ChunkStepBuilder {
            name: self.name,
            chunk_size,
            reader: None,
            processor: None,
            writer: None,
            listeners: ChunkListeners::default(),
        }
    }

    pub fn tasklet(self, tasklet: impl Tasklet + 'static) -> TaskletStepBuilder {
        TaskletStepBuilder {
            name: self.name,
            tasklet: Arc::new(tasklet),
            listeners: Vec::new(),
        }
    }
}

pub struct TaskletStepBuilder {
    name: String,
    tasklet: Arc<dyn Tasklet>,
    listeners: Vec<Arc<dyn StepExecutionListener>>,
}

impl TaskletStepBuilder {
    pub fn listener(mut self, listener: impl StepExecutionListener + 'static) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn build(self) -> Arc<dyn Step> {
        Arc::new(TaskletStep {
            name: self.name,
            tasklet: self.tasklet,
            listeners: self.listeners,
        })
    }
}

pub struct ChunkStepBuilder<I, O> {
    name: String,
    chunk_size: usize,
    reader: Option<Arc<dyn ItemReader<I>>>,
    processor: Option<Arc<dyn ItemProcessor<I, O>>>,
    writer: Option<Arc<dyn ItemWriter<O>>>,
    listeners: ChunkListeners<I, O>,
}

impl<I, O> ChunkStepBuilder<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    pub fn reader(mut self, reader: impl ItemReader<I> + 'static) -> Self {
        self.reader = Some(Arc::new(reader));
        self
    }

    /// Optional. Without one, items are written as read, which requires `I`
    /// and `O` to be the same type.
    pub fn processor(mut self, processor: impl ItemProcessor<I, O> + 'static) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    pub fn writer(mut self, writer: impl ItemWriter<O> + 'static) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    pub fn listener(mut self, listener: impl StepExecutionListener + 'static) -> Self {
        self.listeners.step.push(Arc::new(listener));
        self
    }

    pub fn chunk_listener(mut self, listener: impl ChunkListener + 'static) -> Self {
        self.listeners.chunk.push(Arc::new(listener));
        self
    }

    pub fn read_listener(mut self, listener: impl ItemReadListener<I> + 'static) -> Self {
        self.listeners.read.push(Arc::new(listener));
        self
    }

    pub fn process_listener(mut self, listener: impl ItemProcessListener<I, O> + 'static) -> Self {
        self.listeners.process.push(Arc::new(listener));
        self
    }

    pub fn write_listener(mut self, listener: impl ItemWriteListener<O> + 'static) -> Self {
        self.listeners.write.push(Arc::new(listener));
        self
    }

    /// Switch to a step whose processing failures can be retried or skipped.
    pub fn fault_tolerant(self) -> FaultTolerantChunkStepBuilder<I, O> {
        FaultTolerantChunkStepBuilder {
            chunk: self,
            policies: ItemPolicies::none(),
        }
    }

    pub fn build(self) -> Result<Arc<dyn Step>, ConfigError> {
        Ok(Arc::new(self.build_chunk_step()?))
    }

    fn build_chunk_step(self) -> Result<ChunkOrientedStep<I, O>, ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.name));
        }
        if self.processor.is_none() && TypeId::of::<I>() != TypeId::of::<O>() {
            return Err(ConfigError::MissingProcessor {
                step: self.name,
                input: type_name::<I>(),
                output: type_name::<O>(),
            });
        }
        let Some(reader) = self.reader else {
            return Err(ConfigError::MissingReader(self.name));
        };
        let Some(writer) = self.writer else {
            return Err(ConfigError::MissingWriter(self.name));
        };
        Ok(ChunkOrientedStep {
            name: self.name,
            chunk_size: self.chunk_size,
            reader,
            processor: self.processor,
            writer,
            listeners: self.listeners,
        })
    }
}

pub struct FaultTolerantChunkStepBuilder<I, O> {
    chunk: ChunkStepBuilder<I, O>,
    policies: ItemPolicies,
}

impl<I, O> FaultTolerantChunkStepBuilder<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    pub fn retry_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.policies.retry = Some(Arc::new(policy));
        self
    }

    pub fn skip_policy(mut self, policy: impl SkipPolicy + 'static) -> Self {
        self.policies.skip = Some(Arc::new(policy));
        self
    }

    /// Only consulted between retries, so it has no effect without a retry policy.
    pub fn backoff_policy(mut self, policy: impl BackoffPolicy + 'static) -> Self {
        self.policies.backoff = Some(Arc::new(policy));
        self
    }

    pub fn skip_listener(mut self, listener: impl SkipListener<I, O> + 'static) -> Self {
        self.chunk.listeners.skip.push(Arc::new(listener));
        self
    }

    pub fn build(self) -> Result<Arc<dyn Step>, ConfigError> {
        Ok(Arc::new(FaultTolerantChunkStep {
            chunk: self.chunk.build_chunk_step()?,
            policies: self.policies,
        }))
    }
}
