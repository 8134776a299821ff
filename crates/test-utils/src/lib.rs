// crates/test-utils/src/lib.rs

//! Shared helpers for the `watchguard` integration tests.

pub mod builders;
pub mod fakes;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

pub use builders::OptionsBuilder;
pub use fakes::{
    FakeInteractor, FakeListener, Harness, Journal, JournalFs, RecordingNotifier, RecordingRunner,
};

/// Upper bound for anything a test awaits.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness capture.
///
/// Output shows up for failing tests only, unless run with `--nocapture`.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `fut`, failing the test after [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(out) => out,
        Err(_) => panic!("test timed out after {TEST_TIMEOUT:?}"),
    }
}
