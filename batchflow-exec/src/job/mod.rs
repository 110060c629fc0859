use std::fmt;
use std::sync::Arc;

use crate::flow::Flow;
use crate::listener::JobExecutionListener;
use crate::step::Step;

/// One entry in a job's step list.
#[derive(Clone)]
pub enum JobStep {
    Step(Arc<dyn Step>),
    Flow(Arc<dyn Flow>),
}

impl JobStep {
    pub fn name(&self) -> &str {
        match self {
            JobStep::Step(step) => step.name(),
            JobStep::Flow(flow) => flow.name(),
        }
    }
}

impl fmt::Debug for JobStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStep::Step(step) => f.debug_tuple("Step").field(&step.name()).finish(),
            JobStep::Flow(flow) => f.debug_tuple("Flow").field(&flow.name()).finish(),
        }
    }
}

/// A named, ordered list of steps and flows with job-level listeners.
///
/// Built through [`JobBuilder`](crate::builder::JobBuilder), which rejects an
/// empty step list.
pub struct Job {
    pub(crate) name: String,
    pub(crate) steps: Vec<JobStep>,
    pub(crate) listeners: Vec<Arc<dyn JobExecutionListener>>,
}

impl Job {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[JobStep] {
        &self.steps
    }

    pub(crate) fn listeners(&self) -> &[Arc<dyn JobExecutionListener>] {
        &self.listeners
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("steps", &self.steps)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
