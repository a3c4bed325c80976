//! Handles referencing memory pools.
//!
//! A [`PoolHandle`] is either empty or bound to one [`MemoryPool`]. Handles to
//! the global and thread-local pools alias singletons whose lifetime is managed
//! elsewhere and never keep them alive; handles to freshly created pools share
//! ownership, and the pool is dropped with its last owning handle.
//!
//! Equality is pool identity, not structural equality.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use hemem_memory::{global_pool, thread_pool, MemoryPool, PoolConfig};
use tracing::debug;

use crate::error::MemoryError;

#[derive(Clone, Default)]
enum Binding {
    #[default]
    Empty,
    Global(&'static MemoryPool),
    ThreadLocal(Weak<MemoryPool>),
    Owned(Arc<MemoryPool>),
}

/// Reference to a memory pool, possibly empty.
#[derive(Clone, Default)]
pub struct PoolHandle {
    binding: Binding,
}

/// Borrow of the pool behind a [`PoolHandle`].
pub enum PoolRef<'a> {
    /// A pool reachable for as long as the handle is.
    Borrowed(&'a MemoryPool),
    /// A thread-local pool pinned for the duration of the borrow.
    Pinned(Arc<MemoryPool>),
}

impl Deref for PoolRef<'_> {
    type Target = MemoryPool;

    fn deref(&self) -> &MemoryPool {
        match self {
            Self::Borrowed(pool) => pool,
            Self::Pinned(pool) => pool,
        }
    }
}

impl PoolHandle {
    /// Non-owning handle to the process-wide global pool.
    #[must_use]
    pub fn global() -> Self {
        Self {
            binding: Binding::Global(global_pool()),
        }
    }

    /// Non-owning handle to the calling thread's pool.
    ///
    /// The handle becomes invalid once that thread exits.
    #[must_use]
    pub fn thread_local() -> Self {
        Self {
            binding: Binding::ThreadLocal(thread_pool()),
        }
    }

    /// Owning handle to a brand-new pool.
    ///
    /// With `clear_on_destruction` the pool zeroizes buffers before recycling
    /// or dropping them.
    #[must_use]
    pub fn new_pool(clear_on_destruction: bool) -> Self {
        Self::with_config(PoolConfig::clearing(clear_on_destruction))
    }

    /// Owning handle to a brand-new pool built from `config`.
    #[must_use]
    pub fn with_config(config: PoolConfig) -> Self {
        debug!(
            clear_on_destruction = config.clear_on_destruction,
            "creating new memory pool"
        );
        Self::from(Arc::new(MemoryPool::new(config)))
    }

    /// Whether the handle currently references a live pool.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match &self.binding {
            Binding::Empty => false,
            Binding::Global(_) | Binding::Owned(_) => true,
            Binding::ThreadLocal(pool) => pool.strong_count() > 0,
        }
    }

    /// Whether the handle shares ownership of its pool.
    #[must_use]
    pub fn is_owning(&self) -> bool {
        matches!(self.binding, Binding::Owned(_))
    }

    /// Access the referenced pool.
    pub fn pool(&self) -> Result<PoolRef<'_>, MemoryError> {
        match &self.binding {
            Binding::Empty => Err(MemoryError::pool_not_initialized()),
            Binding::Global(pool) => Ok(PoolRef::Borrowed(*pool)),
            Binding::Owned(pool) => Ok(PoolRef::Borrowed(pool.as_ref())),
            Binding::ThreadLocal(pool) => pool
                .upgrade()
                .map(PoolRef::Pinned)
                .ok_or_else(MemoryError::pool_not_initialized),
        }
    }

    /// Number of size classes served by the referenced pool.
    pub fn pool_count(&self) -> Result<usize, MemoryError> {
        Ok(self.pool()?.pool_count())
    }

    /// Total bytes allocated by the referenced pool.
    pub fn alloc_byte_count(&self) -> Result<usize, MemoryError> {
        Ok(self.pool()?.alloc_byte_count())
    }

    fn as_ptr(&self) -> *const MemoryPool {
        match &self.binding {
            Binding::Empty => std::ptr::null(),
            Binding::Global(pool) => std::ptr::from_ref(*pool),
            Binding::ThreadLocal(pool) => pool.as_ptr(),
            Binding::Owned(pool) => Arc::as_ptr(pool),
        }
    }

    fn kind(&self) -> &'static str {
        match self.binding {
            Binding::Empty => "empty",
            Binding::Global(_) => "global",
            Binding::ThreadLocal(_) => "thread-local",
            Binding::Owned(_) => "owned",
        }
    }
}

impl From<Arc<MemoryPool>> for PoolHandle {
    fn from(pool: Arc<MemoryPool>) -> Self {
        Self {
            binding: Binding::Owned(pool),
        }
    }
}

impl PartialEq for PoolHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl Eq for PoolHandle {}

impl fmt::Debug for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolHandle")
            .field("kind", &self.kind())
            .field("pool", &self.as_ptr())
            .finish()
    }
}
