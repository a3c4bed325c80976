//! Process-wide global pool.

use std::sync::LazyLock;

use crate::config::PoolConfig;
use crate::pool::MemoryPool;

static GLOBAL_POOL: LazyLock<MemoryPool> = LazyLock::new(|| {
    tracing::debug!("initializing global memory pool");
    MemoryPool::new(PoolConfig::default())
});

/// The process-wide pool. Created on first use, never dropped.
#[must_use]
pub fn global_pool() -> &'static MemoryPool {
    &GLOBAL_POOL
}
