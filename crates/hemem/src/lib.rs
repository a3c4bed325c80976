//! hemem: memory pool selection for homomorphic-encryption arithmetic.
//!
//! Re-exports the pool selection API and provides the long-lived objects
//! that acquire a pool once, at construction.

pub mod context;
pub mod params;

// Re-exports
pub use context::Context;
pub use hemem_core::{
    get_pool, AllocationProfile, FixedProfile, GlobalProfile, MemoryError, NewEachTimeProfile,
    PoolHandle, PoolManager, PoolRef, ProfileGuard, ProfileOpt, ThreadLocalProfile,
};
pub use hemem_memory::{MemoryPool, PoolConfig, PoolStats};
pub use params::{EncryptionParameters, SchemeType};
