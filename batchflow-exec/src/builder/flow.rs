use std::collections::HashMap;
use std::sync::Arc;

use crate::flow::{Flow, SimpleFlow, Transition};
use crate::step::Step;

/// Builds a [`SimpleFlow`].
///
/// ```ignore
/// let flow = FlowBuilder::new("import")
///     .start(load)
///     .on("COMPLETED").to(report)
///     .on("FAILED").to(cleanup)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct FlowBuilder {
    name: String,
}

impl FlowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn start(self, step: Arc<dyn Step>) -> SimpleFlowBuilder {
        SimpleFlowBuilder {
            name: self.name,
            current: Arc::clone(&step),
            start: step,
            transitions: HashMap::new(),
        }
    }
}

/// A flow with its start step chosen.
///
/// Transitions attach to the start step until [`from`](Self::from) selects
/// another source step.
pub struct SimpleFlowBuilder {
    name: String,
    start: Arc<dyn Step>,
    current: Arc<dyn Step>,
    transitions: HashMap<String, Vec<Transition>>,
}

impl SimpleFlowBuilder {
    /// Starts a transition out of the current source step for exit codes
    /// matching `pattern` (an exact code or `*`).
    pub fn on(self, pattern: impl Into<String>) -> TransitionBuilder {
        TransitionBuilder {
            flow: self,
            pattern: pattern.into(),
        }
    }

    /// Makes `step` the source of the transitions that follow.
    pub fn from(mut self, step: Arc<dyn Step>) -> Self {
        self.current = step;
        self
    }

    pub fn build(self) -> Arc<dyn Flow> {
        Arc::new(SimpleFlow::new(self.name, self.start, self.transitions))
    }
}

pub struct TransitionBuilder {
    flow: SimpleFlowBuilder,
    pattern: String,
}

impl TransitionBuilder {
    pub fn to(self, target: Arc<dyn Step>) -> SimpleFlowBuilder {
        let mut flow = self.flow;
        flow.transitions
            .entry(flow.current.name().to_string())
            .or_default()
            .push(Transition::new(self.pattern, target));
        flow
    }
}
