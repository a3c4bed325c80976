//! Allocation profiles: strategies deciding which pool serves a request.

use crate::error::MemoryError;
use crate::handle::PoolHandle;
use crate::options::ProfileOpt;

/// Strategy consulted by the [`PoolManager`](crate::PoolManager) for
/// [`ProfileOpt::Default`] requests.
///
/// Implementations must return a valid handle; the manager rejects empty
/// ones in debug builds.
pub trait AllocationProfile: Send + Sync {
    /// Select the pool for a request.
    fn select_pool(&self, opt: ProfileOpt) -> PoolHandle;

    /// Get the name of this profile.
    fn name(&self) -> &'static str;
}

/// Always selects the global pool. Installed by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalProfile;

impl AllocationProfile for GlobalProfile {
    fn select_pool(&self, _opt: ProfileOpt) -> PoolHandle {
        PoolHandle::global()
    }

    fn name(&self) -> &'static str {
        "Global"
    }
}

/// Selects a brand-new pool on every request.
///
/// Nothing allocated through it is ever reused by a later request, so this is
/// only meant for diagnostics and rare one-off work.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewEachTimeProfile;

impl AllocationProfile for NewEachTimeProfile {
    fn select_pool(&self, _opt: ProfileOpt) -> PoolHandle {
        PoolHandle::new_pool(false)
    }

    fn name(&self) -> &'static str {
        "NewEachTime"
    }
}

/// Always selects one pool captured at construction.
#[derive(Debug, Clone)]
pub struct FixedProfile {
    pool: PoolHandle,
}

impl FixedProfile {
    /// Create a profile pinned to `pool`.
    ///
    /// Fails with [`MemoryError::InvalidArgument`] if `pool` does not reference
    /// a live pool.
    pub fn new(pool: PoolHandle) -> Result<Self, MemoryError> {
        if !pool.is_valid() {
            return Err(MemoryError::pool_uninitialized_argument());
        }
        Ok(Self { pool })
    }

    /// The pinned pool.
    #[must_use]
    pub fn pool(&self) -> &PoolHandle {
        &self.pool
    }
}

impl AllocationProfile for FixedProfile {
    fn select_pool(&self, _opt: ProfileOpt) -> PoolHandle {
        self.pool.clone()
    }

    fn name(&self) -> &'static str {
        "Fixed"
    }
}

/// Always selects the calling thread's pool.
///
/// Memory from a thread-local pool goes away when the thread exits, so it
/// cannot be shared between threads; in exchange, heavily threaded workloads
/// stop contending on the global pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalProfile;

impl AllocationProfile for ThreadLocalProfile {
    fn select_pool(&self, _opt: ProfileOpt) -> PoolHandle {
        PoolHandle::thread_local()
    }

    fn name(&self) -> &'static str {
        "ThreadLocal"
    }
}
