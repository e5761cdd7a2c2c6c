mod cmd;
mod config;
mod error;
mod logging;
mod model;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::compare::CompareArgs;

#[derive(Parser)]
#[command(name = "likediff", version, about = "Pairwise overlap screening across submission folders", long_about = None, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff one file across every pair of submitters and write an HTML report per pair
    Compare {
        /// Any submitter's copy of the file; a picker opens when omitted
        file: Option<PathBuf>,
        /// Folder holding one subfolder per submitter, for the picker (default: current dir)
        #[arg(long, conflicts_with = "file")]
        root: Option<PathBuf>,
        /// Worker threads for the pair loop (default: stored setting or CPU count)
        #[arg(long)]
        jobs: Option<usize>,
        /// Per-pair diff deadline in milliseconds, 0 for none (default: stored setting or none)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change the stored defaults
    Config {
        /// Default worker threads
        #[arg(long)]
        jobs: Option<usize>,
        /// Default per-pair diff deadline in milliseconds, 0 for none
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Forget all stored values
        #[arg(long)]
        reset: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);
    match cli.command {
        Commands::Compare { file, root, jobs, timeout_ms, json } => {
            cmd::compare::handle_compare(CompareArgs { file, root, jobs, timeout_ms, json })
        }
        Commands::Config { jobs, timeout_ms, reset } => cmd::config::handle_config(jobs, timeout_ms, reset),
    }
}
