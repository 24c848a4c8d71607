//! Tests for the configuration loader builder.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Every `ROSTER_*` variable the loader reads, cleared for hermetic tests.
pub const ROSTER_VARS: &[&str] = &[
    "ROSTER_PROFILE",
    "ROSTER_CONFIG_PATH",
    "ROSTER_BASE_URL",
    "ROSTER_USERNAME",
    "ROSTER_APP_PASSWORD",
    "ROSTER_API_TOKEN",
    "ROSTER_SKIP_VERIFY",
    "ROSTER_TIMEOUT",
    "ROSTER_MAX_RETRIES",
    "ROSTER_BATCH_CONCURRENCY",
    "ROSTER_ITEM_TIMEOUT",
    "ROSTER_PER_PAGE",
    "ROSTER_USE_BULK_ENDPOINTS",
    "ROSTER_BULK_CHUNK_SIZE",
    "ROSTER_CONFIRM_PHRASE",
    "ROSTER_ORDER_RESOLUTION_URL",
];

/// Run `f` with every `ROSTER_*` variable unset except the given overrides.
pub fn with_roster_env<F: FnOnce()>(overrides: &[(&str, &str)], f: F) {
    let vars: Vec<(&str, Option<&str>)> = ROSTER_VARS
        .iter()
        .map(|key| {
            let value = overrides
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| *v);
            (*key, value)
        })
        .collect();
    temp_env::with_vars(vars, f);
}
