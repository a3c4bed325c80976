//! Error type for pool selection.

/// Errors raised by pool handles, profiles, and the pool manager.
///
/// All variants describe programmer misuse. They are reported immediately and
/// never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    /// An empty pool or profile was passed where a valid one is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation needed a pool but the handle is empty.
    #[error("logic error: {0}")]
    Logic(String),

    /// A profile guard was locked twice or unlocked without owning its lock.
    #[error("usage error: {0}")]
    Usage(String),
}

impl MemoryError {
    pub(crate) fn pool_not_initialized() -> Self {
        Self::Logic("pool not initialized".into())
    }

    pub(crate) fn pool_uninitialized_argument() -> Self {
        Self::InvalidArgument("pool is uninitialized".into())
    }
}
