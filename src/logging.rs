//! tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber writing to stderr. `RUST_LOG` wins when set;
/// otherwise `warn`, or `debug` for this crate with `--verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,skatesync=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (tests calling run() twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
