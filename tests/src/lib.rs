//! Shared helpers for the integration suite.

use sluice::Value;

/// Converts a `serde_json` literal into an engine value.
#[must_use]
pub fn val(value: serde_json::Value) -> Value {
    Value::from(value)
}

/// Installs a test subscriber so traces surface when a test runs with
/// `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
