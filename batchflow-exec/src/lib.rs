#![forbid(unsafe_code)]

//! Execution engine for batchflow jobs.
//!
//! A [`Job`] is an ordered list of steps and flows. Steps either move items
//! through a reader, an optional processor and a writer in bounded chunks, or
//! repeat a single [`Tasklet`] until it reports it is finished. The
//! [`SimpleJobLauncher`] runs a job and records every execution through a
//! [`batchflow_store::JobRepository`].

pub mod builder;
pub mod flow;
pub mod item;
pub mod job;
pub mod launcher;
pub mod listener;
pub mod policy;
pub mod step;

pub use crate::builder::{ConfigError, FlowBuilder, JobBuilder, StepBuilder};
pub use crate::flow::{Flow, FlowExecutor, SimpleFlow, Transition};
pub use crate::item::{ItemProcessor, ItemReader, ItemWriter, Tasklet};
pub use crate::job::{Job, JobStep};
pub use crate::launcher::{JobLauncher, LaunchError, SimpleJobLauncher};
pub use crate::step::{ChunkOrientedStep, FaultTolerantChunkStep, Step, StepError, TaskletStep};
