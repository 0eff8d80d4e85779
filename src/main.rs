mod baseline_cmd;
mod cli;
mod compare_cmd;
mod logging;
mod output_cmd;
mod sample_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

/// Exit status when a comparison exceeds its failure threshold.
const EXIT_THRESHOLD_EXCEEDED: i32 = 2;

/// How a successful command ended.
pub enum Outcome {
    Done,
    ThresholdExceeded,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(Outcome::Done) => {}
        Ok(Outcome::ThresholdExceeded) => process::exit(EXIT_THRESHOLD_EXCEEDED),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(command: Command) -> Result<Outcome> {
    match command {
        Command::Compare(args) => compare_cmd::run(args),
        Command::Baseline(args) => baseline_cmd::run(args),
        Command::Sample(args) => sample_cmd::run(args),
        Command::CompareOutput(args) => output_cmd::run(args),
    }
}
