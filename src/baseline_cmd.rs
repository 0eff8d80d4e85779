//! Baseline command: legacy station CSVs generated from ERA5 or GLDAS.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use forcmatch_batch::{BatchForcingGenerator, SimInterval, write_station_series};
use forcmatch_io::{RunDir, StationRoster};

use crate::Outcome;
use crate::cli::BaselineArgs;
use crate::sample_cmd::load_source;

/// Generate one CSV per roster station over the run's simulation interval.
pub fn run(args: BaselineArgs) -> Result<Outcome> {
    let _cmd = info_span!("baseline").entered();
    let run_root = std::path::absolute(&args.run)
        .with_context(|| format!("invalid run directory: {}", args.run.display()))?;
    let run = RunDir::new(run_root, &args.prj);

    let roster_path = run.roster();
    let roster = StationRoster::read(&roster_path)
        .with_context(|| format!("failed to read station roster: {}", roster_path.display()))?;
    let para = run.para();
    let interval = SimInterval::from_para(&para)
        .with_context(|| format!("failed to read simulation interval: {}", para.display()))?;
    let source = load_source(&args.nc_run, &args.prj)?;
    info!(
        product = %source.product(),
        start_min = interval.start_min,
        end_min = interval.end_min,
        "baseline interval"
    );

    let mut generator = BatchForcingGenerator::from_roster(source, &roster)
        .context("cannot generate a baseline for this configuration")?;
    let series = generator
        .generate(&interval)
        .context("baseline generation failed")?;

    let out_dir = roster.output_dir(run.root());
    write_station_series(&out_dir, generator.clock(), &series)
        .with_context(|| format!("failed to write station CSVs to {}", out_dir.display()))?;
    println!(
        "Wrote {} station CSV file(s) to {}",
        series.len(),
        out_dir.display()
    );
    Ok(Outcome::Done)
}
