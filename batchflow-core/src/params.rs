use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single typed launch parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobParameter {
    String(String),
    Long(i64),
    Double(f64),
}

impl fmt::Display for JobParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobParameter::String(s) => f.write_str(s),
            JobParameter::Long(v) => write!(f, "{v}"),
            JobParameter::Double(v) => write!(f, "{v}"),
        }
    }
}

/// Immutable key/value set identifying one launch. Built with
/// [`JobParameters::builder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobParameters {
    parameters: BTreeMap<String, JobParameter>,
}

impl JobParameters {
    pub fn builder() -> JobParametersBuilder {
        JobParametersBuilder::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&JobParameter> {
        self.parameters.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.parameters.get(key) {
            Some(JobParameter::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        match self.parameters.get(key) {
            Some(JobParameter::Long(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        match self.parameters.get(key) {
            Some(JobParameter::Double(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobParameter)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobParametersBuilder {
    parameters: BTreeMap<String, JobParameter>,
}

impl JobParametersBuilder {
    pub fn add_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(key.into(), JobParameter::String(value.into()));
        self
    }

    pub fn add_long(mut self, key: impl Into<String>, value: i64) -> Self {
        self.parameters.insert(key.into(), JobParameter::Long(value));
        self
    }

    pub fn add_double(mut self, key: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(key.into(), JobParameter::Double(value));
        self
    }

    pub fn to_job_parameters(self) -> JobParameters {
        JobParameters {
            parameters: self.parameters,
        }
    }
}
