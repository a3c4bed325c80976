//! The pool manager: current allocation profile plus synchronized switching.
//!
//! Reads of the current profile (the `Default` path of [`PoolManager::get_pool`])
//! take a short shared lock on the profile slot and never touch the switch
//! mutex. Replacements take the switch mutex first and then the exclusive slot
//! lock, so a reader always sees either the old or the new profile in full.

use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use tracing::{debug, trace, warn};

use crate::error::MemoryError;
use crate::handle::PoolHandle;
use crate::options::ProfileOpt;
use crate::profile::{AllocationProfile, GlobalProfile};

static GLOBAL_MANAGER: LazyLock<PoolManager> = LazyLock::new(PoolManager::new);

/// Owns the active [`AllocationProfile`] and hands out pool handles.
pub struct PoolManager {
    profile: RwLock<Box<dyn AllocationProfile>>,
    switch_lock: ReentrantMutex<()>,
}

impl PoolManager {
    /// Create a manager with [`GlobalProfile`] active.
    #[must_use]
    pub fn new() -> Self {
        Self::with_profile(Box::new(GlobalProfile))
    }

    /// Create a manager with the given profile active.
    #[must_use]
    pub fn with_profile(profile: Box<dyn AllocationProfile>) -> Self {
        Self {
            profile: RwLock::new(profile),
            switch_lock: ReentrantMutex::new(()),
        }
    }

    /// The process-wide manager, initialized with [`GlobalProfile`].
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_MANAGER
    }

    /// Get a pool according to `opt` and the active profile.
    ///
    /// `ForceGlobal`, `ForceNew` and `ForceThreadLocal` bypass the profile.
    /// `Default` is delegated to it; in debug builds an empty result is
    /// reported as [`MemoryError::Logic`].
    pub fn get_pool(&self, opt: ProfileOpt) -> Result<PoolHandle, MemoryError> {
        self.get_pool_with(opt, false)
    }

    /// Like [`get_pool`](Self::get_pool), forwarding `clear_on_destruction`
    /// to the pool created for `ForceNew`.
    pub fn get_pool_with(
        &self,
        opt: ProfileOpt,
        clear_on_destruction: bool,
    ) -> Result<PoolHandle, MemoryError> {
        match opt {
            ProfileOpt::ForceGlobal => Ok(PoolHandle::global()),
            ProfileOpt::ForceNew => Ok(PoolHandle::new_pool(clear_on_destruction)),
            ProfileOpt::ForceThreadLocal => Ok(PoolHandle::thread_local()),
            ProfileOpt::Default => self.select_from_profile(opt),
        }
    }

    /// Shorthand for `get_pool(ProfileOpt::Default)`.
    pub fn default_pool(&self) -> Result<PoolHandle, MemoryError> {
        self.get_pool(ProfileOpt::Default)
    }

    fn select_from_profile(&self, opt: ProfileOpt) -> Result<PoolHandle, MemoryError> {
        let profile = self.profile.read();
        let pool = profile.select_pool(opt);
        trace!(profile = profile.name(), ?pool, "selected pool");

        if cfg!(debug_assertions) && !pool.is_valid() {
            warn!(profile = profile.name(), "profile returned an empty pool");
            return Err(MemoryError::Logic(
                "cannot return uninitialized pool".into(),
            ));
        }
        Ok(pool)
    }

    /// Install `profile` and return the one it replaces.
    ///
    /// Blocks while another thread holds the switch lock (for example through
    /// a locked [`ProfileGuard`](crate::ProfileGuard)).
    pub fn switch_profile(
        &self,
        mut profile: Box<dyn AllocationProfile>,
    ) -> Box<dyn AllocationProfile> {
        let _switching = self.switch_lock.lock();
        self.swap_profile(&mut profile);
        profile
    }

    /// Nullable form of [`switch_profile`](Self::switch_profile).
    ///
    /// Fails with [`MemoryError::InvalidArgument`] when `profile` is `None`.
    pub fn try_switch_profile(
        &self,
        profile: Option<Box<dyn AllocationProfile>>,
    ) -> Result<Box<dyn AllocationProfile>, MemoryError> {
        let profile = profile
            .ok_or_else(|| MemoryError::InvalidArgument("profile cannot be null".into()))?;
        Ok(self.switch_profile(profile))
    }

    /// Reinstall [`GlobalProfile`], returning the displaced profile.
    pub fn reset(&self) -> Box<dyn AllocationProfile> {
        self.switch_profile(Box::new(GlobalProfile))
    }

    /// Name of the active profile.
    #[must_use]
    pub fn profile_name(&self) -> &'static str {
        self.profile.read().name()
    }

    /// Exchange the active profile with `profile`. The caller must hold the
    /// switch lock.
    pub(crate) fn swap_profile(&self, profile: &mut Box<dyn AllocationProfile>) {
        let mut current = self.profile.write();
        debug!(
            from = current.name(),
            to = profile.name(),
            "switching allocation profile"
        );
        std::mem::swap(&mut *current, profile);
    }

    pub(crate) fn lock_switch(&self) -> ReentrantMutexGuard<'_, ()> {
        self.switch_lock.lock()
    }

    pub(crate) fn try_lock_switch(&self) -> Option<ReentrantMutexGuard<'_, ()>> {
        self.switch_lock.try_lock()
    }
}

impl Default for PoolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PoolManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolManager")
            .field("profile", &self.profile_name())
            .finish()
    }
}
