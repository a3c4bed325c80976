//! Pool request selector.

/// Directive attached to a pool request.
///
/// The forcing variants are honored by the [`PoolManager`](crate::PoolManager)
/// itself and never reach the active profile. Values are mutually exclusive
/// even though the discriminants are single bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum ProfileOpt {
    /// Let the active profile decide.
    #[default]
    Default = 0x0,
    /// Always use the process-wide global pool.
    ForceGlobal = 0x1,
    /// Always create a fresh pool.
    ForceNew = 0x2,
    /// Always use the calling thread's pool.
    ForceThreadLocal = 0x4,
}

impl ProfileOpt {
    /// Every selector value.
    pub const ALL: [Self; 4] = [
        Self::Default,
        Self::ForceGlobal,
        Self::ForceNew,
        Self::ForceThreadLocal,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selector() {
        assert_eq!(ProfileOpt::default(), ProfileOpt::Default);
    }

    #[test]
    fn discriminants_are_single_bits() {
        assert_eq!(ProfileOpt::Default as u64, 0);
        for opt in &ProfileOpt::ALL[1..] {
            assert_eq!((*opt as u64).count_ones(), 1);
        }
    }
}
