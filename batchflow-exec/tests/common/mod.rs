#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use batchflow_core::{ExitStatus, JobExecution, RepeatStatus, StepExecution};
use batchflow_exec::item::tasklet_fn;
use batchflow_exec::listener::{
    ChunkListener, ItemProcessListener, ItemReadListener, ItemWriteListener, JobExecutionListener,
    SkipListener, StepExecutionListener,
};
use batchflow_exec::{Step, StepBuilder};

#[derive(Debug, thiserror::Error)]
#[error("transient failure")]
pub struct Transient;

#[derive(Debug, thiserror::Error)]
#[error("bad item {0}")]
pub struct BadItem(pub i32);

pub fn step_execution(name: &str) -> StepExecution {
    StepExecution::new(1, name, 1)
}

pub fn ok_step(name: &str) -> Arc<dyn Step> {
    StepBuilder::new(name)
        .tasklet(tasklet_fn(|_, _| Ok(RepeatStatus::Finished)))
        .build()
}

pub fn failing_step(name: &str) -> Arc<dyn Step> {
    StepBuilder::new(name)
        .tasklet(tasklet_fn(|_, _| Err(BadItem(0).into())))
        .build()
}

pub fn exit_code_step(name: &str, exit_code: &'static str) -> Arc<dyn Step> {
    StepBuilder::new(name)
        .tasklet(tasklet_fn(move |contribution, _| {
            contribution.set_exit_status(ExitStatus::new(exit_code));
            Ok(RepeatStatus::Finished)
        }))
        .build()
}

/// Records every listener callback as a short string, in call order.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

fn list(items: &[i32]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl JobExecutionListener for Recorder {
    fn before_job(&self, job_execution: &JobExecution) {
        self.push(format!("before_job({})", job_execution.status()));
    }

    fn after_job(&self, job_execution: &JobExecution) {
        self.push(format!("after_job({})", job_execution.status()));
    }
}

impl StepExecutionListener for Recorder {
    fn before_step(&self, step_execution: &StepExecution) {
        self.push(format!("before_step({})", step_execution.step_name()));
    }

    fn after_step(&self, step_execution: &StepExecution) {
        self.push(format!("after_step({})", step_execution.step_name()));
    }
}

impl ChunkListener for Recorder {
    fn before_chunk(&self) {
        self.push("before_chunk");
    }

    fn after_chunk(&self) {
        self.push("after_chunk");
    }

    fn after_chunk_error(&self, _error: &anyhow::Error) {
        self.push("after_chunk_error");
    }
}

impl ItemReadListener<i32> for Recorder {
    fn before_read(&self) {
        self.push("before_read");
    }

    fn after_read(&self, item: &i32) {
        self.push(format!("after_read({item})"));
    }

    fn on_read_error(&self, _error: &anyhow::Error) {
        self.push("on_read_error");
    }
}

impl ItemProcessListener<i32, i32> for Recorder {
    fn before_process(&self, item: &i32) {
        self.push(format!("before_process({item})"));
    }

    fn after_process(&self, item: &i32, result: Option<&i32>) {
        match result {
            Some(out) => self.push(format!("after_process({item}->{out})")),
            None => self.push(format!("after_process({item}->filtered)")),
        }
    }

    fn on_process_error(&self, item: &i32, _error: &anyhow::Error) {
        self.push(format!("on_process_error({item})"));
    }
}

impl ItemWriteListener<i32> for Recorder {
    fn before_write(&self, items: &[i32]) {
        self.push(format!("before_write([{}])", list(items)));
    }

    fn after_write(&self, items: &[i32]) {
        self.push(format!("after_write([{}])", list(items)));
    }

    fn on_write_error(&self, items: &[i32], _error: &anyhow::Error) {
        self.push(format!("on_write_error([{}])", list(items)));
    }
}

impl SkipListener<i32, i32> for Recorder {
    fn on_skip_in_process(&self, item: &i32, error: &anyhow::Error) {
        self.push(format!("on_skip_in_process({item}: {error})"));
    }
}
