//! Compare command: baseline station CSV forcing against NetCDF.

use anyhow::{Context, Result};
use tracing::info_span;

use forcmatch_compare::{ForcingCompareRequest, compare_forcing, format_g, write_json};
use forcmatch_product::QueryOptions;

use crate::Outcome;
use crate::cli::CompareArgs;

/// Run the sampled forcing comparison and print its summary.
pub fn run(args: CompareArgs) -> Result<Outcome> {
    let _cmd = info_span!("compare").entered();
    let options = QueryOptions::default()
        .with_clamp(args.clamp)
        .with_time_tolerance(args.time_tol_min);
    let request = ForcingCompareRequest::new(&args.baseline_run, &args.nc_run, &args.prj)
        .with_stations(args.stations)
        .with_times_min(args.t_min)
        .with_options(options);

    let report = compare_forcing(&request)
        .with_context(|| format!("forcing comparison failed for project '{}'", args.prj))?;

    println!("== Forcing compare summary (baseline - nc) ==");
    for (var, s) in report.summary.iter() {
        println!(
            "- {}: max_abs={} mean={} mean_abs={}",
            var.key(),
            format_g(s.max_abs, 6),
            format_g(s.mean, 6),
            format_g(s.mean_abs, 6),
        );
    }

    if let Some(path) = &args.out_json {
        let written = write_json(path, &report)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        println!("Wrote: {}", written.display());
    }

    let over = report.exceeding(args.fail_max_abs.unwrap_or(f64::INFINITY));
    if over.is_empty() {
        return Ok(Outcome::Done);
    }
    eprintln!("ERROR: max_abs diff exceeded threshold:");
    for (var, max_abs) in &over {
        eprintln!("- {}: {max_abs:?}", var.key());
    }
    Ok(Outcome::ThresholdExceeded)
}
