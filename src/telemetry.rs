//! Tracing setup for binaries, demos and benches embedding the pipe.

use tracing_subscriber::EnvFilter;

/// Environment variable read by [`init_tracing`].
pub const LOG_ENV: &str = "ERROR_PIPE_LOG";

/// Installs a fmt subscriber filtered by `ERROR_PIPE_LOG`, defaulting to `info`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();
}

/// Installs a fmt subscriber with an explicit filter string.
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_tracing_with_filter("debug");
        init_tracing();
        tracing::info!("subscriber installed once");
    }
}
