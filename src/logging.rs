use tracing_subscriber::EnvFilter;

/// Overrides the `-v` derived level, e.g. `JSONFOLD_LOG=jsonfold=trace`.
const LOG_ENV: &str = "JSONFOLD_LOG";

pub fn setup_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
