//! Process-wide tracing setup shared by every Polaris binary.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize logging from the environment.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
