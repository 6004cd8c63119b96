use tracing_subscriber::EnvFilter;

/// Installs a `tracing-subscriber` fmt layer. `RUST_LOG` always wins when
/// set; `--debug` only changes the default when it isn't.
pub fn setup_tracing(debug: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
