//! Word-buffer pool with power-of-two size classes.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;
use zeroize::Zeroize;

use crate::config::PoolConfig;
use crate::stats::{AtomicPoolStats, PoolStats};

/// Smallest size class, in words.
pub const MIN_CLASS_WORDS: usize = 8;

const WORD_BYTES: usize = std::mem::size_of::<u64>();

/// Thread-safe pool of zero-filled `u64` buffers, organized by size class.
///
/// A size class is the requested word count rounded up to a power of two
/// (at least [`MIN_CLASS_WORDS`]). Buffers handed out by [`allocate`] are
/// owned by the caller until they are given back through [`deallocate`].
///
/// [`allocate`]: MemoryPool::allocate
/// [`deallocate`]: MemoryPool::deallocate
#[derive(Debug)]
pub struct MemoryPool {
    classes: Mutex<HashMap<usize, Vec<Vec<u64>>>>,
    config: PoolConfig,
    stats: AtomicPoolStats,
}

impl MemoryPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self {
            classes: Mutex::new(HashMap::new()),
            config: config.normalize(),
            stats: AtomicPoolStats::default(),
        }
    }

    /// Get a zero-filled buffer of `words` elements, reusing a free one if possible.
    pub fn allocate(&self, words: usize) -> Vec<u64> {
        let class = Self::size_class(words);
        let reused = self.classes.lock().entry(class).or_default().pop();

        if let Some(mut buffer) = reused {
            self.stats.record_hit();
            trace!(words, class, "pool hit");
            buffer.clear();
            buffer.resize(words, 0);
            return buffer;
        }

        self.stats.record_miss(class * WORD_BYTES);
        trace!(words, class, "pool miss");
        let mut buffer = Vec::with_capacity(class);
        buffer.resize(words, 0);
        buffer
    }

    /// Return a buffer to the pool.
    ///
    /// Buffers not obtained from this pool are accepted as long as their
    /// capacity fits a size class.
    pub fn deallocate(&self, mut buffer: Vec<u64>) {
        if self.config.clear_on_destruction {
            buffer.zeroize();
        }

        let capacity = buffer.capacity();
        if capacity < MIN_CLASS_WORDS || capacity > self.config.max_buffer_words {
            self.stats.record_eviction();
            return;
        }

        let class = Self::class_of_capacity(capacity);
        let mut classes = self.classes.lock();
        let free = classes.entry(class).or_default();
        if free.len() < self.config.max_per_class {
            free.push(buffer);
        } else {
            self.stats.record_eviction();
        }
    }

    /// Compute the size class serving a request of `words` words.
    fn size_class(words: usize) -> usize {
        words
            .max(MIN_CLASS_WORDS)
            .checked_next_power_of_two()
            .unwrap_or(words)
    }

    /// Largest size class a buffer of the given capacity can serve.
    fn class_of_capacity(capacity: usize) -> usize {
        1 << (usize::BITS - 1 - capacity.leading_zeros())
    }

    /// Number of distinct size classes this pool has served.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.classes.lock().len()
    }

    /// Total bytes this pool has allocated from the system.
    #[must_use]
    pub fn alloc_byte_count(&self) -> usize {
        self.stats.alloc_bytes()
    }

    /// Get total number of free buffers held by the pool.
    #[must_use]
    pub fn total_pooled(&self) -> usize {
        self.classes.lock().values().map(Vec::len).sum()
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Zero the hit, miss and eviction counters. `alloc_byte_count` is kept.
    pub fn reset_stats(&self) {
        self.stats.reset_requests();
    }

    /// Release all free buffers. Size classes stay registered.
    pub fn clear(&self) {
        for free in self.classes.lock().values_mut() {
            free.clear();
        }
    }

    /// The configuration this pool was built with.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}
