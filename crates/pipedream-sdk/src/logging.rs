//! Stderr logging for step processes. Stdout belongs to step output.

/// Install a stderr `tracing` subscriber filtered by `filter`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_logging(filter: &str) {
    use tracing_subscriber::prelude::*;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .try_init();
}
