//! Sample command: one direct point query.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info_span;

use forcmatch_io::{KvConfig, RunDir, Station, StationRoster};
use forcmatch_product::{ForcingSourceConfig, ProductAdapter, QueryOptions};
use forcmatch_quantize::ForcingVariable;
use forcmatch_time::ForcingClock;

use crate::Outcome;
use crate::cli::SampleArgs;

/// Typed forcing configuration of `<nc_run>/input/<prj>/<prj>.cfg.forcing`.
pub fn load_source(nc_run: &Path, prj: &str) -> Result<ForcingSourceConfig> {
    let root = std::path::absolute(nc_run)
        .with_context(|| format!("invalid NetCDF run directory: {}", nc_run.display()))?;
    let path = RunDir::new(&root, prj).forcing_config();
    let kv = KvConfig::read(&path)
        .with_context(|| format!("failed to read forcing config: {}", path.display()))?;
    ForcingSourceConfig::from_kv(&kv, &root)
        .with_context(|| format!("invalid forcing config: {}", path.display()))
}

/// Resolve one canonical sample and print its five values.
pub fn run(args: SampleArgs) -> Result<Outcome> {
    let _cmd = info_span!("sample").entered();
    let source = load_source(&args.nc_run, &args.prj)?;
    let product = source.product();

    let forc_start = match args.forc_start {
        Some(date) => date,
        None => {
            let path = RunDir::new(&args.nc_run, &args.prj).roster();
            StationRoster::read(&path)
                .with_context(|| format!("no --forc-start and no roster at {}", path.display()))?
                .forcing_start_yyyymmdd
        }
    };
    let clock = ForcingClock::from_yyyymmdd(forc_start)
        .with_context(|| format!("invalid forcing start date {forc_start}"))?;

    let options = QueryOptions::default()
        .with_clamp(args.clamp)
        .with_time_tolerance(args.time_tol_min);
    let adapter = ProductAdapter::new(source, clock, options);
    let station = Station {
        index: 0,
        longitude_deg: args.lon,
        latitude_deg: args.lat,
        filename: String::new(),
    };
    let sample = adapter.resolve_sample(&station, args.t_min).with_context(|| {
        format!(
            "{product} query failed at lon={} lat={} t_min={}",
            args.lon, args.lat, args.t_min
        )
    })?;

    println!(
        "== {product} sample (lon={}, lat={}, t_min={}) ==",
        args.lon, args.lat, args.t_min
    );
    for var in ForcingVariable::ALL {
        println!("- {}: {:.*}", var.key(), var.decimals(), sample.get(var));
    }
    Ok(Outcome::Done)
}
