//! Shared helpers for texbake's integration tests.

pub mod builders;
pub mod fake_compiler;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for any single async test body.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Filtered by `RUST_LOG`, defaulting to `texbake=debug` so scheduler and
/// worker decisions show up in the output of a failing test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,texbake=debug"));

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Await `fut`, panicking if it runs longer than [`TEST_TIMEOUT`].
///
/// A hung build (lost completion, stuck worker) fails the test instead of
/// blocking the suite.
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(value) => value,
        Err(_) => panic!("build did not finish within {TEST_TIMEOUT:?}"),
    }
}
