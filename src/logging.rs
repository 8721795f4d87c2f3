//! Tracing subscriber setup shared by both binaries.

use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Install the global fmt subscriber.
///
/// Level comes from `RUST_LOG`, defaulting to `info`. Output goes to stderr
/// so stdout stays free for table output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}
