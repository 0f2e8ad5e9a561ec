use crate::{FileWorkerGuard, Tracer};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
const TEST_DIRECTIVES: &str = "cliquenet=debug";

/// Tracer for unit tests.
///
/// Events of the `cliquenet` targets are written through the test harness, so they are only shown
/// for failing tests. `RUST_LOG` replaces the filter.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct TestTracer;

impl Tracer for TestTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(TEST_DIRECTIVES));
        // fails if another test of the same binary installed it first
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
        Ok(None)
    }
}
