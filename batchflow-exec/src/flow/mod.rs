//! Conditional routing between steps based on exit codes.

mod simple;

use std::sync::Arc;

use async_trait::async_trait;

use batchflow_core::ExitStatus;

use crate::step::Step;

pub use simple::{SimpleFlow, Transition};

/// Runs one step of a flow on the flow's behalf and reports its exit status.
///
/// The launcher implements this so that every step in a flow is recorded
/// exactly like a top-level step.
#[async_trait]
pub trait FlowExecutor: Send {
    async fn execute_step(&mut self, step: &Arc<dyn Step>) -> Result<ExitStatus, anyhow::Error>;
}

#[async_trait]
pub trait Flow: Send + Sync {
    fn name(&self) -> &str;

    /// Runs the flow to completion and returns the exit status of the last
    /// step that ran. Step failures are routed, never propagated.
    async fn execute(&self, executor: &mut dyn FlowExecutor) -> ExitStatus;
}
