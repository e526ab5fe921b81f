//! Process-wide logging setup shared by the admin client binaries.

/// Tracing subscriber configuration.
pub mod tracing;

/// Initialize logging with the default filter (`info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}
