use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle tag of a job or step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Starting,
    Started,
    Completed,
    Failed,
    Stopping,
    Stopped,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Starting => "STARTING",
            BatchStatus::Started => "STARTED",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Failed => "FAILED",
            BatchStatus::Stopping => "STOPPING",
            BatchStatus::Stopped => "STOPPED",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, BatchStatus::Starting | BatchStatus::Started | BatchStatus::Stopping)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business outcome of a step, flow or job.
///
/// Distinct from [`BatchStatus`]: the exit code is what flow transitions match
/// against, and callers may use codes of their own beyond the four constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitStatus {
    exit_code: Cow<'static, str>,
    exit_description: Cow<'static, str>,
}

impl ExitStatus {
    pub const COMPLETED: ExitStatus = ExitStatus::constant("COMPLETED");
    pub const FAILED: ExitStatus = ExitStatus::constant("FAILED");
    pub const STOPPED: ExitStatus = ExitStatus::constant("STOPPED");
    pub const UNKNOWN: ExitStatus = ExitStatus::constant("UNKNOWN");

    const fn constant(code: &'static str) -> Self {
        Self {
            exit_code: Cow::Borrowed(code),
            exit_description: Cow::Borrowed(""),
        }
    }

    pub fn new(exit_code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            exit_code: exit_code.into(),
            exit_description: Cow::Borrowed(""),
        }
    }

    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.exit_description = description.into();
        self
    }

    pub fn exit_code(&self) -> &str {
        &self.exit_code
    }

    pub fn exit_description(&self) -> &str {
        &self.exit_description
    }

    /// Combines two statuses, keeping the more severe one.
    ///
    /// `FAILED` wins over `STOPPED`, which wins over anything else; otherwise
    /// `self` is returned unchanged.
    pub fn and(&self, other: &ExitStatus) -> ExitStatus {
        if self.is_failed() || other.is_failed() {
            return ExitStatus::FAILED;
        }
        if self.exit_code == Self::STOPPED.exit_code || other.exit_code == Self::STOPPED.exit_code {
            return ExitStatus::STOPPED;
        }
        self.clone()
    }

    pub fn is_failed(&self) -> bool {
        self.exit_code == Self::FAILED.exit_code
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        ExitStatus::UNKNOWN
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exit_description.is_empty() {
            f.write_str(&self.exit_code)
        } else {
            write!(f, "{} ({})", self.exit_code, self.exit_description)
        }
    }
}

/// Continuation signal returned by a tasklet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatStatus {
    /// More work remains; the tasklet is invoked again.
    Continuable,
    Finished,
}

impl RepeatStatus {
    pub fn is_continuable(&self) -> bool {
        matches!(self, RepeatStatus::Continuable)
    }

    /// `Continuable` when `more` is true.
    pub fn continue_if(more: bool) -> Self {
        if more {
            RepeatStatus::Continuable
        } else {
            RepeatStatus::Finished
        }
    }
}
