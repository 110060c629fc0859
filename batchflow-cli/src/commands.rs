use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a `;`-separated person file through the chunk pipeline.
    Run {
        path: PathBuf,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Parse a person file and report problems without running a job.
    Check {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}
