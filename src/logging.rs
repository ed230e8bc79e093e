use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `AISLE_LOG=debug`
pub const LOG_ENV: &str = "AISLE_LOG";

/// Level used when `AISLE_LOG` is unset
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "aisle=debug" } else { "warn" }
}

/// Install the stderr subscriber for CLI commands. Safe to call more than
/// once; later calls are ignored.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
