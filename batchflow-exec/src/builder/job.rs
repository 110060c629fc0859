use std::sync::Arc;

use crate::flow::Flow;
use crate::job::{Job, JobStep};
use crate::listener::JobExecutionListener;
use crate::step::Step;

use super::ConfigError;

pub struct JobBuilder {
    name: String,
    steps: Vec<JobStep>,
    listeners: Vec<Arc<dyn JobExecutionListener>>,
}

impl JobBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn start(self, step: Arc<dyn Step>) -> Self {
        self.next(step)
    }

    pub fn next(mut self, step: Arc<dyn Step>) -> Self {
        self.steps.push(JobStep::Step(step));
        self
    }

    pub fn start_flow(self, flow: Arc<dyn Flow>) -> Self {
        self.next_flow(flow)
    }

    pub fn next_flow(mut self, flow: Arc<dyn Flow>) -> Self {
        self.steps.push(JobStep::Flow(flow));
        self
    }

    pub fn listener(mut self, listener: impl JobExecutionListener + 'static) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn build(self) -> Result<Job, ConfigError> {
        if self.steps.is_empty() {
            return Err(ConfigError::NoSteps(self.name));
        }
        Ok(Job {
            name: self.name,
            steps: self.steps,
            listeners: self.listeners,
        })
    }
}
