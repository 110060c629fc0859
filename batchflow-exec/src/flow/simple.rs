use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use batchflow_core::ExitStatus;

use super::{Flow, FlowExecutor};
use crate::step::Step;

/// Exit-code pattern that routes a source step to `target`.
///
/// The pattern is either an exact exit code or `*`, which matches anything.
#[derive(Clone)]
pub struct Transition {
    pattern: String,
    target: Arc<dyn Step>,
}

impl Transition {
    pub const WILDCARD: &'static str = "*";

    pub fn new(pattern: impl Into<String>, target: Arc<dyn Step>) -> Self {
        Self {
            pattern: pattern.into(),
            target,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn target(&self) -> &Arc<dyn Step> {
        &self.target
    }

    pub fn matches(&self, exit_status: &ExitStatus) -> bool {
        self.pattern == Self::WILDCARD || self.pattern == exit_status.exit_code()
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("pattern", &self.pattern)
            .field("target", &self.target.name())
            .finish()
    }
}

/// Flow that starts at one step and follows the first matching transition
/// after each step until none matches.
///
/// Transitions are keyed by source step name and tried in declaration order.
/// There is no cycle detection: transitions that loop back keep running for
/// as long as they match.
pub struct SimpleFlow {
    name: String,
    start: Arc<dyn Step>,
    transitions: HashMap<String, Vec<Transition>>,
}

impl SimpleFlow {
    pub fn new(
        name: impl Into<String>,
        start: Arc<dyn Step>,
        transitions: HashMap<String, Vec<Transition>>,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            transitions,
        }
    }

    pub fn start_step(&self) -> &Arc<dyn Step> {
        &self.start
    }

    pub fn transitions_from(&self, step_name: &str) -> &[Transition] {
        self.transitions
            .get(step_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The step to run after `step_name` finished with `exit_status`, if any.
    pub fn next_step(&self, step_name: &str, exit_status: &ExitStatus) -> Option<Arc<dyn Step>> {
        self.transitions_from(step_name)
            .iter()
            .find(|t| t.matches(exit_status))
            .map(|t| Arc::clone(t.target()))
    }
}

#[async_trait]
impl Flow for SimpleFlow {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, executor: &mut dyn FlowExecutor) -> ExitStatus {
        let mut current = Some(Arc::clone(&self.start));
        let mut last = ExitStatus::COMPLETED;
        while let Some(step) = current {
            last = match executor.execute_step(&step).await {
                Ok(exit_status) => exit_status,
                Err(e) => {
                    warn!(flow = %self.name, step = step.name(), error = %e, "flow step failed");
                    ExitStatus::FAILED
                }
            };
            current = self.next_step(step.name(), &last);
            if let Some(next) = &current {
                debug!(
                    flow = %self.name,
                    from = step.name(),
                    exit_code = last.exit_code(),
                    to = next.name(),
                    "flow transition"
                );
            }
        }
        last
    }
}
