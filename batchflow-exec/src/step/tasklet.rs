use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use batchflow_core::{RepeatStatus, StepContribution, StepExecution};

use super::{Step, StepError};
use crate::item::Tasklet;
use crate::listener::StepExecutionListener;

/// Calls a [`Tasklet`] until it reports [`RepeatStatus::Finished`].
pub struct TaskletStep {
    pub(crate) name: String,
    pub(crate) tasklet: Arc<dyn Tasklet>,
    pub(crate) listeners: Vec<Arc<dyn StepExecutionListener>>,
}

impl TaskletStep {
    async fn repeat(
        &self,
        contribution: &mut StepContribution,
        step_execution: &StepExecution,
    ) -> Result<(), StepError> {
        let context = step_execution.execution_context().clone();
        let mut iterations = 0u64;
        loop {
            iterations += 1;
            let status = self
                .tasklet
                .execute(contribution, &context)
                .await
                .map_err(StepError::Tasklet)?;
            if status == RepeatStatus::Finished {
                debug!(step = %self.name, iterations, "tasklet finished");
                return Ok(());
            }
        }
    }
}

#[async_trait]
impl Step for TaskletStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, step_execution: &mut StepExecution) -> Result<(), StepError> {
        for l in &self.listeners {
            l.before_step(step_execution);
        }
        let mut contribution = StepContribution::new();
        let result = self.repeat(&mut contribution, step_execution).await;
        step_execution.apply(&contribution);
        for l in &self.listeners {
            l.after_step(step_execution);
        }
        result
    }
}
