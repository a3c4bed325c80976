//! Encryption parameters.

use hemem_core::{MemoryError, PoolHandle, PoolManager};

/// Homomorphic encryption scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SchemeType {
    /// Brakerski/Fan-Vercauteren, exact integer arithmetic.
    Bfv = 0x1,
    /// Cheon-Kim-Kim-Song, approximate arithmetic.
    Ckks = 0x2,
}

impl TryFrom<u8> for SchemeType {
    type Error = MemoryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x1 => Ok(Self::Bfv),
            0x2 => Ok(Self::Ckks),
            _ => Err(MemoryError::InvalidArgument("unsupported scheme".into())),
        }
    }
}

/// Scheme selection plus the pool its scratch allocations use.
#[derive(Debug, Clone)]
pub struct EncryptionParameters {
    scheme: SchemeType,
    pool: PoolHandle,
}

impl EncryptionParameters {
    /// Parameters drawing their pool from the process-wide manager.
    pub fn new(scheme: SchemeType) -> Result<Self, MemoryError> {
        Self::from_manager(scheme, PoolManager::global())
    }

    /// Parameters drawing their pool from `manager`'s active profile.
    pub fn from_manager(scheme: SchemeType, manager: &PoolManager) -> Result<Self, MemoryError> {
        Self::with_pool(scheme, manager.default_pool()?)
    }

    /// Parameters bound to an explicit pool.
    pub fn with_pool(scheme: SchemeType, pool: PoolHandle) -> Result<Self, MemoryError> {
        if !pool.is_valid() {
            return Err(MemoryError::InvalidArgument("pool is uninitialized".into()));
        }
        Ok(Self { scheme, pool })
    }

    /// The selected scheme.
    #[must_use]
    pub fn scheme(&self) -> SchemeType {
        self.scheme
    }

    /// The pool acquired at construction.
    #[must_use]
    pub fn pool(&self) -> &PoolHandle {
        &self.pool
    }
}
