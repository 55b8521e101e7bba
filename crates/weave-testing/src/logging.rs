//! Tracing output for test runs

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives for test output
pub const LOG_ENV: &str = "WEAVE_TEST_LOG";

static INIT: Once = Once::new();

/// Install a fmt subscriber writing through the test harness, once per process
///
/// Directives come from `WEAVE_TEST_LOG` (e.g. `weave_core=debug`) and fall
/// back to `warn`.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
