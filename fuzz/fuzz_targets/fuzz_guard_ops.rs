#![no_main]

use libfuzzer_sys::fuzz_target;

use hemem_core::{
    AllocationProfile, FixedProfile, GlobalProfile, MemoryError, NewEachTimeProfile, PoolHandle,
    PoolManager, ProfileGuard, ThreadLocalProfile,
};

fn profile(byte: u8) -> Box<dyn AllocationProfile> {
    match byte % 4 {
        0 => Box::new(GlobalProfile),
        1 => Box::new(NewEachTimeProfile),
        2 => Box::new(ThreadLocalProfile),
        _ => Box::new(FixedProfile::new(PoolHandle::global()).unwrap()),
    }
}

/// Name of the profile a stack of guards should leave active: the innermost
/// locked guard wins.
fn expected_active(stack: &[(ProfileGuard<'_>, &'static str)]) -> &'static str {
    stack
        .iter()
        .rev()
        .find(|(guard, _)| guard.owns_lock())
        .map_or("Global", |(_, name)| *name)
}

fuzz_target!(|data: &[u8]| {
    let manager = PoolManager::new();
    let mut stack: Vec<(ProfileGuard<'_>, &'static str)> = Vec::new();

    // Only the innermost guard is operated on, so restoration stays nested.
    for pair in data.chunks_exact(2).take(64) {
        let (op, arg) = (pair[0] % 6, pair[1]);
        match op {
            0 => {
                let selected = profile(arg);
                let name = selected.name();
                let guard = ProfileGuard::with_manager(&manager, selected, arg & 0x80 != 0);
                stack.push((guard, name));
            }
            1 => {
                stack.pop();
            }
            2 => {
                if let Some((guard, _)) = stack.last_mut() {
                    let was_locked = guard.owns_lock();
                    let result = guard.unlock();
                    assert_eq!(result.is_ok(), was_locked);
                    assert!(!guard.owns_lock());
                }
            }
            3 => {
                if let Some((guard, _)) = stack.last_mut() {
                    let was_locked = guard.owns_lock();
                    match guard.lock() {
                        Ok(()) => assert!(!was_locked),
                        Err(MemoryError::Usage(_)) => assert!(was_locked),
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                    assert!(guard.owns_lock());
                }
            }
            4 => {
                if let Some((guard, _)) = stack.last_mut() {
                    let was_locked = guard.owns_lock();
                    // Same thread: the reentrant switch lock is always available.
                    assert_eq!(guard.try_lock().is_ok(), !was_locked);
                    assert!(guard.owns_lock());
                }
            }
            _ => {
                assert!(manager.default_pool().unwrap().is_valid());
            }
        }
        assert_eq!(manager.profile_name(), expected_active(&stack));
    }

    while stack.pop().is_some() {}
    assert_eq!(manager.profile_name(), "Global");
});
