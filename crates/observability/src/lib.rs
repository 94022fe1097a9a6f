//! Tracing setup shared by binaries and tests that use relay emitters.

/// Initialize process-wide tracing (JSON logs).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize tracing for tests (human-readable, captured per test).
pub fn init_for_tests() {
    tracing::init_for_tests();
}

/// Subscriber construction (filters, formatters).
pub mod tracing;
