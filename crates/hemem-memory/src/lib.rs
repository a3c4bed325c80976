//! # hemem-memory
//!
//! Backing pools for the hemem allocation layer.
//!
//! Provides a size-classed pool of `u64` word buffers, lock-free usage
//! statistics, and the two singleton pools that handles alias without owning:
//! the process-wide global pool and the per-thread pool.
#![warn(missing_docs)]

pub mod config;
pub mod global;
pub mod pool;
pub mod stats;
pub mod thread_local;

// Re-exports
pub use config::PoolConfig;
pub use global::global_pool;
pub use pool::MemoryPool;
pub use stats::PoolStats;
pub use thread_local::thread_pool;
