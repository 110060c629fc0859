use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::RunArgs;

/// Effective settings for one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub chunk_size: usize,
    pub skip_limit: u64,
    pub retry_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2,
            skip_limit: 0,
            retry_attempts: 1,
            backoff_ms: 0,
        }
    }
}

impl RunConfig {
    /// Whether the step needs retry or skip handling at all.
    pub fn is_fault_tolerant(&self) -> bool {
        self.skip_limit > 0 || self.retry_attempts > 1
    }

    /// Layers command-line and environment values over the config file.
    pub fn resolve(args: &RunArgs) -> Result<Self, ConfigFileError> {
        let mut config = match &args.config {
            Some(path) => load_config_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(v) = args.chunk_size {
            config.chunk_size = v;
        }
        if let Some(v) = args.skip_limit {
            config.skip_limit = v;
        }
        if let Some(v) = args.retry_attempts {
            config.retry_attempts = v;
        }
        if let Some(v) = args.backoff_ms {
            config.backoff_ms = v;
        }
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is neither valid JSON nor valid YAML: {message}")]
    Parse { path: String, message: String },
}

fn load_config_file(path: &Path) -> Result<RunConfig, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if let Ok(config) = serde_json::from_str(&content) {
        return Ok(config);
    }
    serde_yaml::from_str(&content).map_err(|e| ConfigFileError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
