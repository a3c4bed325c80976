//! Shared support for the hemem integration tests.

use parking_lot::{Mutex, MutexGuard};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

static GLOBAL_MANAGER_LOCK: Mutex<()> = Mutex::new(());

/// Install a test-writer subscriber once per test binary. `RUST_LOG` adds
/// directives on top of the default WARN level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into()))
        .with_test_writer()
        .try_init();
}

/// Serialize tests that observe the process-wide `PoolManager`.
///
/// Profile guards already exclude each other, but a test asserting on the
/// active profile must not see another test's switch in between.
pub fn serial() -> MutexGuard<'static, ()> {
    GLOBAL_MANAGER_LOCK.lock()
}
