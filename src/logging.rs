use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "forcmatch",
    "forcmatch_batch",
    "forcmatch_compare",
    "forcmatch_grid",
    "forcmatch_io",
    "forcmatch_product",
    "forcmatch_quantize",
    "forcmatch_time",
];

/// Initialize tracing from the `-v` count: none is warn, `-v` info, `-vv`
/// debug and anything more trace. `RUST_LOG` wins when set.
///
/// Logs go to stderr so reports printed on stdout stay clean.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
