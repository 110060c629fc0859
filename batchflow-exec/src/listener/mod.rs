//! Lifecycle callbacks.
//!
//! Every method has an empty default so implementors only override the
//! events they care about. Listeners are called synchronously, in
//! registration order, on the task running the step.

mod set;

use batchflow_core::{JobExecution, StepExecution};

pub(crate) use set::ChunkListeners;

pub trait JobExecutionListener: Send + Sync {
    fn before_job(&self, _job_execution: &JobExecution) {}
    fn after_job(&self, _job_execution: &JobExecution) {}
}

pub trait StepExecutionListener: Send + Sync {
    fn before_step(&self, _step_execution: &StepExecution) {}
    fn after_step(&self, _step_execution: &StepExecution) {}
}

pub trait ChunkListener: Send + Sync {
    fn before_chunk(&self) {}
    fn after_chunk(&self) {}
    fn after_chunk_error(&self, _error: &anyhow::Error) {}
}

pub trait ItemReadListener<T>: Send + Sync {
    fn before_read(&self) {}
    fn after_read(&self, _item: &T) {}
    fn on_read_error(&self, _error: &anyhow::Error) {}
}

pub trait ItemProcessListener<I, O>: Send + Sync {
    fn before_process(&self, _item: &I) {}
    /// `result` is `None` when the processor filtered the item.
    fn after_process(&self, _item: &I, _result: Option<&O>) {}
    fn on_process_error(&self, _item: &I, _error: &anyhow::Error) {}
}

pub trait ItemWriteListener<O>: Send + Sync {
    fn before_write(&self, _items: &[O]) {}
    fn after_write(&self, _items: &[O]) {}
    fn on_write_error(&self, _items: &[O], _error: &anyhow::Error) {}
}

/// Notified when a fault-tolerant step skips an item.
///
/// Only processing failures are skippable, so only the process variant is
/// ever called by the engine.
pub trait SkipListener<I, O>: Send + Sync {
    fn on_skip_in_read(&self, _error: &anyhow::Error) {}
    fn on_skip_in_process(&self, _item: &I, _error: &anyhow::Error) {}
    fn on_skip_in_write(&self, _item: &O, _error: &anyhow::Error) {}
}
