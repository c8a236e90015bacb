use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a batch against the appliance.
    Execute {
        /// Batch file (JSON or YAML list of items).
        path: PathBuf,
        #[arg(long)]
        continue_on_fail: bool,
        /// Where to write downloaded attachments.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Emit lifecycle events as JSON lines on stderr.
        #[arg(long)]
        events: bool,
        #[command(flatten)]
        operation: OperationArgs,
        #[command(flatten)]
        appliance: ApplianceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the requests a batch would send, without sending them.
    Plan {
        path: PathBuf,
        #[command(flatten)]
        operation: OperationArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
