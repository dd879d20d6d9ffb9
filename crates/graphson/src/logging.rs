use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `verbose` forces `debug`; otherwise
/// `RUST_LOG` applies, falling back to `warn`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded or under test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
