use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `srr=trace`.
pub const LOG_ENV: &str = "SRR_LOG";

/// Installs the global diagnostics subscriber, writing to stderr.
///
/// Progress lines go to stdout through the event writer; this only carries
/// diagnostics. Calling it more than once is harmless.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "srr=debug" } else { "srr=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
