use serde::Serialize;

use crate::runtime::status::ExitStatus;

/// Per-`execute` accumulator of item counts.
///
/// A step creates one at the start of its run and folds it into its
/// [`StepExecution`](crate::StepExecution) once, via `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepContribution {
    read_count: u64,
    write_count: u64,
    filter_count: u64,
    skip_count_in_read: u64,
    skip_count_in_process: u64,
    skip_count_in_write: u64,
    exit_status: ExitStatus,
}

impl Default for StepContribution {
    fn default() -> Self {
        Self::new()
    }
}

impl StepContribution {
    pub fn new() -> Self {
        Self {
            read_count: 0,
            write_count: 0,
            filter_count: 0,
            skip_count_in_read: 0,
            skip_count_in_process: 0,
            skip_count_in_write: 0,
            exit_status: ExitStatus::COMPLETED,
        }
    }

    pub fn increment_read_count(&mut self) {
        self.read_count += 1;
    }

    pub fn increment_write_count(&mut self, count: u64) {
        self.write_count += count;
    }

    pub fn increment_filter_count(&mut self) {
        self.filter_count += 1;
    }

    pub fn increment_skip_count_in_read(&mut self) {
        self.skip_count_in_read += 1;
    }

    pub fn increment_skip_count_in_process(&mut self) {
        self.skip_count_in_process += 1;
    }

    pub fn increment_skip_count_in_write(&mut self) {
        self.skip_count_in_write += 1;
    }

    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn filter_count(&self) -> u64 {
        self.filter_count
    }

    /// Skips across the read, process and write phases.
    pub fn skip_count(&self) -> u64 {
        self.skip_count_in_read + self.skip_count_in_process + self.skip_count_in_write
    }

    pub fn skip_count_in_read(&self) -> u64 {
        self.skip_count_in_read
    }

    pub fn skip_count_in_process(&self) -> u64 {
        self.skip_count_in_process
    }

    pub fn skip_count_in_write(&self) -> u64 {
        self.skip_count_in_write
    }

    pub fn exit_status(&self) -> &ExitStatus {
        &self.exit_status
    }

    pub fn set_exit_status(&mut self, exit_status: ExitStatus) {
        self.exit_status = exit_status;
    }
}
