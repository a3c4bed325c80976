//! Per-thread pool.
//!
//! Each thread lazily gets its own [`MemoryPool`], dropped when the thread
//! exits. Callers only ever receive a [`Weak`] reference to it, so a handle
//! that outlives its thread observes the pool as gone instead of keeping it
//! alive.

use std::sync::{Arc, Weak};

use crate::config::PoolConfig;
use crate::pool::MemoryPool;

thread_local! {
    static THREAD_POOL: Arc<MemoryPool> = Arc::new(MemoryPool::new(PoolConfig::default()));
}

/// Non-owning reference to the calling thread's pool.
///
/// Returns a dangling `Weak` if called while the thread-local storage is
/// being torn down.
#[must_use]
pub fn thread_pool() -> Weak<MemoryPool> {
    THREAD_POOL
        .try_with(Arc::downgrade)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_thread_same_pool() {
        let a = thread_pool();
        let b = thread_pool();
        assert!(a.ptr_eq(&b));
        assert!(a.upgrade().is_some());
    }

    #[test]
    fn other_thread_other_pool() {
        let here = thread_pool();
        let there = std::thread::spawn(thread_pool).join().unwrap();
        assert!(!here.ptr_eq(&there));
    }

    #[test]
    fn pool_released_when_thread_exits() {
        let there = std::thread::spawn(|| {
            let weak = thread_pool();
            let pool = weak.upgrade().unwrap();
            let buffer = pool.allocate(32);
            pool.deallocate(buffer);
            weak
        })
        .join()
        .unwrap();
        assert!(there.upgrade().is_none());
    }
}
