use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Regression checks for gridded NetCDF forcing against legacy station CSV forcing.
#[derive(Parser)]
#[command(
    name = "forcmatch",
    version,
    about = "Compare CMFD2/ERA5/GLDAS NetCDF forcing with legacy station CSV forcing"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Sampled comparison of baseline station CSVs against NetCDF point queries.
    Compare(CompareArgs),
    /// Generate legacy station CSVs from ERA5 or GLDAS NetCDF.
    Baseline(BaselineArgs),
    /// Print the canonical forcing of one point query.
    Sample(SampleArgs),
    /// Sampled comparison of legacy binary output against a NetCDF variable.
    CompareOutput(CompareOutputArgs),
}

/// Arguments for the `compare` subcommand.
#[derive(clap::Args)]
pub struct CompareArgs {
    /// Baseline run directory (holds input/<prj>/<prj>.tsd.forc).
    #[arg(long)]
    pub baseline_run: PathBuf,

    /// NetCDF run directory (holds input/<prj>/<prj>.cfg.forcing).
    #[arg(long)]
    pub nc_run: PathBuf,

    /// Project name.
    #[arg(long)]
    pub prj: String,

    /// 0-based station indices.
    #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
    pub stations: Vec<usize>,

    /// Sample times in minutes since the forcing start.
    #[arg(long = "t-min", value_delimiter = ',', default_value = "0,180")]
    pub t_min: Vec<f64>,

    /// Clamp times outside the NetCDF time axis instead of failing.
    #[arg(long)]
    pub clamp: bool,

    /// Time tolerance in minutes for range checks and record selection.
    #[arg(long, default_value_t = 1e-3)]
    pub time_tol_min: f64,

    /// Write the JSON report to this path.
    #[arg(long)]
    pub out_json: Option<PathBuf>,

    /// Fail (exit 2) when any variable's max_abs difference exceeds this.
    #[arg(long)]
    pub fail_max_abs: Option<f64>,
}

/// Arguments for the `baseline` subcommand.
#[derive(clap::Args)]
pub struct BaselineArgs {
    /// Target run directory (holds the roster and <prj>.cfg.para).
    #[arg(long)]
    pub run: PathBuf,

    /// NetCDF run directory (holds input/<prj>/<prj>.cfg.forcing).
    #[arg(long)]
    pub nc_run: PathBuf,

    /// Project name.
    #[arg(long)]
    pub prj: String,
}

/// Arguments for the `sample` subcommand.
#[derive(clap::Args)]
pub struct SampleArgs {
    /// NetCDF run directory (holds input/<prj>/<prj>.cfg.forcing).
    #[arg(long)]
    pub nc_run: PathBuf,

    /// Project name.
    #[arg(long)]
    pub prj: String,

    /// Station longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Station latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Query time in minutes since the forcing start.
    #[arg(long = "t-min")]
    pub t_min: f64,

    /// Forcing start date (YYYYMMDD); read from the run's roster when omitted.
    #[arg(long)]
    pub forc_start: Option<u32>,

    /// Clamp times outside the NetCDF time axis instead of failing.
    #[arg(long)]
    pub clamp: bool,

    /// Time tolerance in minutes for range checks and record selection.
    #[arg(long, default_value_t = 1e-3)]
    pub time_tol_min: f64,
}

/// Arguments for the `compare-output` subcommand.
#[derive(clap::Args)]
pub struct CompareOutputArgs {
    /// Legacy binary output file (*.dat).
    #[arg(long)]
    pub legacy_bin: PathBuf,

    /// NetCDF output file.
    #[arg(long)]
    pub netcdf: PathBuf,

    /// NetCDF variable to compare.
    #[arg(long)]
    pub var: String,

    /// NetCDF time dimension.
    #[arg(long, default_value = "time")]
    pub time_dim: String,

    /// NetCDF object dimension; inferred when the variable has exactly one
    /// other dimension.
    #[arg(long)]
    pub obj_dim: Option<String>,

    /// Sample times in minutes; defaults to the first two records.
    #[arg(long, value_delimiter = ',')]
    pub times_min: Option<Vec<f64>>,

    /// 1-based object indices; defaults to the first three output columns.
    #[arg(long, value_delimiter = ',')]
    pub indices: Option<Vec<i64>>,

    /// Time match tolerance in minutes.
    #[arg(long, default_value_t = 1e-6)]
    pub time_tol: f64,

    /// Write the JSON report to this path.
    #[arg(long)]
    pub out_json: Option<PathBuf>,
}
