//! # hemem-core
//!
//! Pool selection for scratch-buffer requests in homomorphic-encryption
//! arithmetic.
//!
//! Every request goes through the [`PoolManager`], which either honors a forcing
//! [`ProfileOpt`] or asks the active [`AllocationProfile`] which pool to use.
//! The active profile can be replaced process-wide with
//! [`PoolManager::switch_profile`], or for a bounded scope with a
//! [`ProfileGuard`] that restores the previous profile on every exit path.
//!
//! ```
//! use hemem_core::{PoolHandle, PoolManager, ProfileGuard, ThreadLocalProfile};
//!
//! let manager = PoolManager::new();
//! {
//!     let _guard = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), true);
//!     assert_eq!(manager.default_pool().unwrap(), PoolHandle::thread_local());
//! }
//! assert_eq!(manager.default_pool().unwrap(), PoolHandle::global());
//! ```
#![warn(missing_docs)]

pub mod error;
pub mod guard;
pub mod handle;
pub mod manager;
pub mod options;
pub mod profile;

// Re-exports
pub use error::MemoryError;
pub use guard::ProfileGuard;
pub use handle::{PoolHandle, PoolRef};
pub use manager::PoolManager;
pub use options::ProfileOpt;
pub use profile::{
    AllocationProfile, FixedProfile, GlobalProfile, NewEachTimeProfile, ThreadLocalProfile,
};

/// Get a pool from the process-wide manager using its active profile.
///
/// Convenience for `PoolManager::global().default_pool()`.
pub fn get_pool() -> Result<PoolHandle, MemoryError> {
    PoolManager::global().default_pool()
}
