use std::sync::Arc;

use batchflow_core::StepExecution;

use super::{
    ChunkListener, ItemProcessListener, ItemReadListener, ItemWriteListener, SkipListener,
    StepExecutionListener,
};

/// Every listener registered on a chunk step, grouped by kind.
pub(crate) struct ChunkListeners<I, O> {
    pub(crate) step: Vec<Arc<dyn StepExecutionListener>>,
    pub(crate) chunk: Vec<Arc<dyn ChunkListener>>,
    pub(crate) read: Vec<Arc<dyn ItemReadListener<I>>>,
    pub(crate) process: Vec<Arc<dyn ItemProcessListener<I, O>>>,
    pub(crate) write: Vec<Arc<dyn ItemWriteListener<O>>>,
    pub(crate) skip: Vec<Arc<dyn SkipListener<I, O>>>,
}

impl<I, O> Default for ChunkListeners<I, O> {
    fn default() -> Self {
        Self {
            step: Vec::new(),
            chunk: Vec::new(),
            read: Vec::new(),
            process: Vec::new(),
            write: Vec::new(),
            skip: Vec::new(),
        }
    }
}

impl<I, O> ChunkListeners<I, O> {
    pub(crate) fn before_step(&self, step_execution: &StepExecution) {
        for l in &self.step {
            l.before_step(step_execution);
        }
    }

    pub(crate) fn after_step(&self, step_execution: &StepExecution) {
        for l in &self.step {
            l.after_step(step_execution);
        }
    }

    pub(crate) fn before_chunk(&self) {
        for l in &self.chunk {
            l.before_chunk();
        }
    }

    pub(crate) fn after_chunk(&self) {
        for l in &self.chunk {
            l.after_chunk();
        }
    }

    pub(crate) fn after_chunk_error(&self, error: &anyhow::Error) {
        for l in &self.chunk {
            l.after_chunk_error(error);
        }
    }

    pub(crate) fn before_read(&self) {
        for l in &self.read {
            l.before_read();
        }
    }

    pub(crate) fn after_read(&self, item: &I) {
        for l in &self.read {
            l.after_read(item);
        }
    }

    pub(crate) fn on_read_error(&self, error: &anyhow::Error) {
        for l in &self.read {
            l.on_read_error(error);
        }
    }

    pub(crate) fn before_process(&self, item: &I) {
        for l in &self.process {
            l.before_process(item);
        }
    }

    pub(crate) fn after_process(&self, item: &I, result: Option<&O>) {
        for l in &self.process {
            l.after_process(item, result);
        }
    }

    pub(crate) fn on_process_error(&self, item: &I, error: &anyhow::Error) {
        for l in &self.process {
            l.on_process_error(item, error);
        }
    }

    pub(crate) fn before_write(&self, items: &[O]) {
        for l in &self.write {
            l.before_write(items);
        }
    }

    pub(crate) fn after_write(&self, items: &[O]) {
        for l in &self.write {
            l.after_write(items);
        }
    }

    pub(crate) fn on_write_error(&self, items: &[O], error: &anyhow::Error) {
        for l in &self.write {
            l.on_write_error(items, error);
        }
    }

    pub(crate) fn on_skip_in_process(&self, item: &I, error: &anyhow::Error) {
        for l in &self.skip {
            l.on_skip_in_process(item, error);
        }
    }
}
