//! Encryption context.

use std::sync::Arc;

use hemem_core::{MemoryError, PoolHandle, PoolManager};
use tracing::debug;

use crate::params::EncryptionParameters;

/// Validated parameters plus the pool used for precomputation.
///
/// A context acquires its own pool when it is created, independently of the
/// pool stored in its parameters.
#[derive(Debug)]
pub struct Context {
    parms: EncryptionParameters,
    expand_mod_chain: bool,
    pool: PoolHandle,
}

impl Context {
    /// Create a context whose pool comes from the process-wide manager.
    pub fn create(
        parms: &EncryptionParameters,
        expand_mod_chain: bool,
    ) -> Result<Arc<Self>, MemoryError> {
        Self::from_manager(PoolManager::global(), parms, expand_mod_chain)
    }

    /// Create a context whose pool comes from `manager`'s active profile.
    pub fn from_manager(
        manager: &PoolManager,
        parms: &EncryptionParameters,
        expand_mod_chain: bool,
    ) -> Result<Arc<Self>, MemoryError> {
        let pool = manager.default_pool()?;
        Self::with_pool(parms, expand_mod_chain, pool)
    }

    /// Create a context bound to an explicit pool.
    pub fn with_pool(
        parms: &EncryptionParameters,
        expand_mod_chain: bool,
        pool: PoolHandle,
    ) -> Result<Arc<Self>, MemoryError> {
        if !pool.is_valid() {
            return Err(MemoryError::InvalidArgument("pool is uninitialized".into()));
        }
        debug!(scheme = ?parms.scheme(), expand_mod_chain, ?pool, "creating context");
        Ok(Arc::new(Self {
            parms: parms.clone(),
            expand_mod_chain,
            pool,
        }))
    }

    /// The parameters this context was created from.
    #[must_use]
    pub fn parameters(&self) -> &EncryptionParameters {
        &self.parms
    }

    /// Whether the modulus switching chain is expanded.
    #[must_use]
    pub fn expand_mod_chain(&self) -> bool {
        self.expand_mod_chain
    }

    /// The pool acquired at construction.
    #[must_use]
    pub fn pool(&self) -> &PoolHandle {
        &self.pool
    }
}
