//! Process-wide logging setup shared by every stockroom binary and test.

/// Tracing subscriber configuration.
pub mod tracing;

pub use self::tracing::LogFormat;

/// Install the default subscriber (JSON lines, filtered by `RUST_LOG`).
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    tracing::init(LogFormat::Json);
}
