//! Scoped profile switching.
//!
//! A [`ProfileGuard`] holds the manager's switch lock while its profile is
//! installed. Dropping a locked guard puts the displaced profile back and
//! releases the lock, so the previous profile is in effect again however the
//! guarded scope is left, including by an early return, a `?` or a panic.
//!
//! The switch lock is reentrant: guards may nest on one thread. The innermost
//! guard must be released first for restoration to unwind in order. Guards on
//! different threads exclude each other.

use parking_lot::ReentrantMutexGuard;
use tracing::debug;

use crate::error::MemoryError;
use crate::manager::PoolManager;
use crate::profile::AllocationProfile;

/// Installs an allocation profile for a bounded scope.
///
/// While unlocked, `profile` is the profile the next [`lock`](Self::lock)
/// will install. While locked, it is the displaced profile awaiting
/// restoration.
#[must_use = "dropping the guard immediately restores the previous profile"]
pub struct ProfileGuard<'a> {
    manager: &'a PoolManager,
    profile: Box<dyn AllocationProfile>,
    lock: Option<ReentrantMutexGuard<'a, ()>>,
}

impl ProfileGuard<'static> {
    /// Guard over the process-wide manager.
    ///
    /// With `start_locked` the guard blocks for the switch lock and installs
    /// `profile` right away; otherwise it waits for an explicit lock call.
    pub fn new(profile: Box<dyn AllocationProfile>, start_locked: bool) -> Self {
        Self::with_manager(PoolManager::global(), profile, start_locked)
    }
}

impl<'a> ProfileGuard<'a> {
    /// Guard over a specific manager.
    pub fn with_manager(
        manager: &'a PoolManager,
        profile: Box<dyn AllocationProfile>,
        start_locked: bool,
    ) -> Self {
        let mut guard = Self {
            manager,
            profile,
            lock: None,
        };
        if start_locked {
            let lock = manager.lock_switch();
            guard.install(lock);
        }
        guard
    }

    /// Block for the switch lock and install the pending profile.
    pub fn lock(&mut self) -> Result<(), MemoryError> {
        self.ensure_unlocked()?;
        let lock = self.manager.lock_switch();
        self.install(lock);
        Ok(())
    }

    /// Block for the switch lock and install `profile`.
    ///
    /// If the guard is already locked, `profile` is dropped and the guard is
    /// left untouched.
    pub fn lock_with(&mut self, profile: Box<dyn AllocationProfile>) -> Result<(), MemoryError> {
        self.ensure_unlocked()?;
        self.profile = profile;
        self.lock()
    }

    /// Install the pending profile if the switch lock is free right now.
    ///
    /// Returns `Ok(false)` without changing anything when another thread
    /// holds the lock.
    pub fn try_lock(&mut self) -> Result<bool, MemoryError> {
        self.ensure_unlocked()?;
        match self.manager.try_lock_switch() {
            Some(lock) => {
                self.install(lock);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Install `profile` if the switch lock is free right now.
    ///
    /// On `Ok(false)` the pending profile is unchanged and `profile` is dropped.
    pub fn try_lock_with(
        &mut self,
        profile: Box<dyn AllocationProfile>,
    ) -> Result<bool, MemoryError> {
        self.ensure_unlocked()?;
        match self.manager.try_lock_switch() {
            Some(lock) => {
                self.profile = profile;
                self.install(lock);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Restore the displaced profile and release the switch lock.
    ///
    /// The profile this guard had installed becomes pending again, so a later
    /// [`lock`](Self::lock) reinstalls it.
    pub fn unlock(&mut self) -> Result<(), MemoryError> {
        if !self.release() {
            return Err(MemoryError::Usage("lock is not owned".into()));
        }
        Ok(())
    }

    /// Whether this guard holds the switch lock.
    #[must_use]
    pub fn owns_lock(&self) -> bool {
        self.lock.is_some()
    }

    fn ensure_unlocked(&self) -> Result<(), MemoryError> {
        if self.owns_lock() {
            return Err(MemoryError::Usage("lock is already owned".into()));
        }
        Ok(())
    }

    fn install(&mut self, lock: ReentrantMutexGuard<'a, ()>) {
        self.manager.swap_profile(&mut self.profile);
        self.lock = Some(lock);
        debug!(displaced = self.profile.name(), "profile guard locked");
    }

    /// Swap the displaced profile back in and drop the lock. Returns whether
    /// the guard was locked.
    fn release(&mut self) -> bool {
        let Some(lock) = self.lock.take() else {
            return false;
        };
        self.manager.swap_profile(&mut self.profile);
        drop(lock);
        debug!(restored = self.manager.profile_name(), "profile guard released");
        true
    }
}

impl Drop for ProfileGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::PoolHandle;
    use crate::profile::{FixedProfile, GlobalProfile, NewEachTimeProfile, ThreadLocalProfile};

    #[test]
    fn start_locked_installs_and_drop_restores() {
        let manager = PoolManager::new();
        {
            let guard = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), true);
            assert!(guard.owns_lock());
            assert_eq!(manager.profile_name(), "ThreadLocal");
            assert_eq!(manager.default_pool().unwrap(), PoolHandle::thread_local());
        }
        assert_eq!(manager.profile_name(), "Global");
    }

    #[test]
    fn deferred_guard_waits_for_lock() {
        let manager = PoolManager::new();
        let mut guard =
            ProfileGuard::with_manager(&manager, Box::new(NewEachTimeProfile), false);
        assert!(!guard.owns_lock());
        assert_eq!(manager.profile_name(), "Global");

        guard.lock().unwrap();
        assert!(guard.owns_lock());
        assert_eq!(manager.profile_name(), "NewEachTime");

        guard.unlock().unwrap();
        assert!(!guard.owns_lock());
        assert_eq!(manager.profile_name(), "Global");
    }

    #[test]
    fn double_lock_is_usage_error() {
        let manager = PoolManager::new();
        let mut guard = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), true);
        assert_eq!(
            guard.lock(),
            Err(MemoryError::Usage("lock is already owned".into()))
        );
        assert_eq!(
            guard.lock_with(Box::new(NewEachTimeProfile)),
            Err(MemoryError::Usage("lock is already owned".into()))
        );
        assert!(guard.try_lock().is_err());
        assert!(guard.owns_lock());
        assert_eq!(manager.profile_name(), "ThreadLocal");

        drop(guard);
        assert_eq!(manager.profile_name(), "Global");
    }

    #[test]
    fn unlock_without_lock_is_usage_error() {
        let manager = PoolManager::new();
        let mut guard = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), false);
        assert_eq!(
            guard.unlock(),
            Err(MemoryError::Usage("lock is not owned".into()))
        );

        guard.lock().unwrap();
        guard.unlock().unwrap();
        assert!(guard.unlock().is_err());
        assert_eq!(manager.profile_name(), "Global");
    }

    #[test]
    fn guard_cycles_reinstall_its_profile() {
        let manager = PoolManager::new();
        let mut guard = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), true);
        for _ in 0..3 {
            assert_eq!(manager.profile_name(), "ThreadLocal");
            guard.unlock().unwrap();
            assert_eq!(manager.profile_name(), "Global");
            guard.lock().unwrap();
        }
    }

    #[test]
    fn lock_with_replaces_pending_profile() {
        let manager = PoolManager::new();
        let mut guard = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), false);
        guard.lock_with(Box::new(NewEachTimeProfile)).unwrap();
        assert_eq!(manager.profile_name(), "NewEachTime");
        guard.unlock().unwrap();

        assert!(guard.try_lock_with(Box::new(GlobalProfile)).unwrap());
        assert_eq!(manager.profile_name(), "Global");
    }

    #[test]
    fn nested_guards_restore_in_order() {
        let manager = PoolManager::new();
        let p1 = PoolHandle::new_pool(false);
        let p2 = PoolHandle::new_pool(false);

        let g1 = ProfileGuard::with_manager(
            &manager,
            Box::new(FixedProfile::new(p1.clone()).unwrap()),
            true,
        );
        assert_eq!(manager.default_pool().unwrap(), p1);
        {
            let g2 = ProfileGuard::with_manager(
                &manager,
                Box::new(FixedProfile::new(p2.clone()).unwrap()),
                true,
            );
            assert!(g2.owns_lock());
            assert_eq!(manager.default_pool().unwrap(), p2);
        }
        assert_eq!(manager.default_pool().unwrap(), p1);
        drop(g1);
        assert_eq!(manager.default_pool().unwrap(), PoolHandle::global());
    }

    #[test]
    fn deep_nesting_unwinds_in_order() {
        let manager = PoolManager::new();
        let pools: Vec<_> = (0..10).map(|_| PoolHandle::new_pool(false)).collect();

        let mut guards = Vec::new();
        for pool in &pools {
            guards.push(ProfileGuard::with_manager(
                &manager,
                Box::new(FixedProfile::new(pool.clone()).unwrap()),
                true,
            ));
            assert_eq!(&manager.default_pool().unwrap(), pool);
        }

        for depth in (0..pools.len()).rev() {
            assert_eq!(manager.default_pool().unwrap(), pools[depth]);
            drop(guards.pop());
        }
        assert_eq!(manager.default_pool().unwrap(), PoolHandle::global());
    }

    #[test]
    fn same_thread_try_lock_reenters() {
        let manager = PoolManager::new();
        let _outer = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), true);
        let mut inner = ProfileGuard::with_manager(&manager, Box::new(NewEachTimeProfile), false);
        assert!(inner.try_lock().unwrap());
        assert_eq!(manager.profile_name(), "NewEachTime");
        inner.unlock().unwrap();
        assert_eq!(manager.profile_name(), "ThreadLocal");
    }

    #[test]
    fn restores_on_early_error_return() {
        fn guarded(manager: &PoolManager) -> Result<(), MemoryError> {
            let _guard = ProfileGuard::with_manager(manager, Box::new(NewEachTimeProfile), true);
            FixedProfile::new(PoolHandle::default())?;
            Ok(())
        }

        let manager = PoolManager::new();
        assert!(guarded(&manager).is_err());
        assert_eq!(manager.profile_name(), "Global");
    }

    #[test]
    fn restores_on_panic() {
        let manager = PoolManager::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), true);
            assert_eq!(manager.profile_name(), "ThreadLocal");
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(manager.profile_name(), "Global");

        // The switch lock was released on the way out.
        std::thread::scope(|s| {
            s.spawn(|| {
                let mut guard =
                    ProfileGuard::with_manager(&manager, Box::new(NewEachTimeProfile), false);
                assert!(guard.try_lock().unwrap());
            });
        });
    }

    #[test]
    fn try_lock_fails_while_other_thread_holds_lock() {
        let manager = PoolManager::new();
        let (locked_tx, locked_rx) = crossbeam_channel::bounded::<()>(0);
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);

        std::thread::scope(|s| {
            s.spawn(|| {
                let _holder =
                    ProfileGuard::with_manager(&manager, Box::new(ThreadLocalProfile), true);
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            });

            locked_rx.recv().unwrap();
            let mut guard =
                ProfileGuard::with_manager(&manager, Box::new(NewEachTimeProfile), false);
            assert!(!guard.try_lock().unwrap());
            assert!(!guard.owns_lock());
            assert!(!guard.try_lock_with(Box::new(GlobalProfile)).unwrap());
            assert_eq!(manager.profile_name(), "ThreadLocal");

            release_tx.send(()).unwrap();
            // The holder restores before releasing, so a blocking lock here
            // observes the original profile as the one it displaces.
            guard.lock().unwrap();
            assert_eq!(manager.profile_name(), "NewEachTime");
            guard.unlock().unwrap();
            assert_eq!(manager.profile_name(), "Global");
        });
    }
}
