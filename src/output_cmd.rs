//! Compare-output command: legacy binary output against NetCDF.

use anyhow::{Context, Result};
use tracing::info_span;

use forcmatch_compare::{OutputCompareRequest, compare_output, format_g, write_json};

use crate::Outcome;
use crate::cli::CompareOutputArgs;

/// Run the sampled output comparison and print its summary.
pub fn run(args: CompareOutputArgs) -> Result<Outcome> {
    let _cmd = info_span!("compare_output").entered();
    let request = OutputCompareRequest::new(&args.legacy_bin, &args.netcdf, &args.var)
        .with_time_dim(&args.time_dim)
        .with_obj_dim(args.obj_dim.filter(|d| !d.trim().is_empty()))
        .with_times_min(args.times_min)
        .with_indices(args.indices)
        .with_time_tolerance(args.time_tol);

    let report = compare_output(&request).with_context(|| {
        format!(
            "output comparison failed for '{}' ({} vs {})",
            args.var,
            args.legacy_bin.display(),
            args.netcdf.display()
        )
    })?;

    println!("== Output compare summary (legacy - netcdf) ==");
    println!("- samples: {}", report.summary.count);
    println!("- max_abs: {}", format_g(report.summary.max_abs, 6));
    println!("- mean_abs: {}", format_g(report.summary.mean_abs, 6));

    if let Some(path) = &args.out_json {
        let written = write_json(path, &report)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        println!("Wrote: {}", written.display());
    }
    Ok(Outcome::Done)
}
