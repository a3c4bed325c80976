//! Request and byte accounting for a [`MemoryPool`](crate::MemoryPool).

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;

/// Point-in-time view of a pool's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Requests served from a free list.
    pub hits: u64,
    /// Requests that needed a fresh buffer.
    pub misses: u64,
    /// Returned buffers dropped instead of recycled.
    pub evictions: u64,
    /// Bytes obtained from the system for fresh buffers. Monotonic.
    pub alloc_bytes: usize,
}

impl PoolStats {
    /// Total allocation requests seen.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Live counters updated without taking the pool's free-list lock.
#[derive(Debug, Default)]
pub(crate) struct AtomicPoolStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    alloc_bytes: AtomicUsize,
}

impl AtomicPoolStats {
    pub(crate) fn snapshot(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            alloc_bytes: self.alloc_bytes(),
        }
    }

    /// Zero the request counters. Byte accounting is left alone.
    pub(crate) fn reset_requests(&self) {
        for counter in [&self.hits, &self.misses, &self.evictions] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn alloc_bytes(&self) -> usize {
        self.alloc_bytes.load(Ordering::Relaxed)
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A miss allocates `bytes` from the system.
    pub(crate) fn record_miss(&self, bytes: usize) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.alloc_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}
