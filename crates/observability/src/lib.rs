//! Process-wide tracing setup shared by carshop binaries.

/// Initialize process-wide logging with the format named by
/// `CARSHOP_LOG_FORMAT` (compact when unset).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{LogFormat, init_with};
