//! Pool configuration.

use serde::{Deserialize, Serialize};

/// Default number of free buffers kept per size class.
pub const DEFAULT_MAX_PER_CLASS: usize = 32;

/// Default largest buffer (in 64-bit words) a pool will keep for reuse: 128 MiB.
pub const DEFAULT_MAX_BUFFER_WORDS: usize = 1 << 24;

/// Configuration for a [`MemoryPool`](crate::pool::MemoryPool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of free buffers retained per size class.
    pub max_per_class: usize,
    /// Largest buffer capacity (in words) retained on a free list.
    pub max_buffer_words: usize,
    /// Zeroize buffers before they are recycled or dropped by the pool.
    pub clear_on_destruction: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_per_class: DEFAULT_MAX_PER_CLASS,
            max_buffer_words: DEFAULT_MAX_BUFFER_WORDS,
            clear_on_destruction: false,
        }
    }
}

impl PoolConfig {
    /// Default configuration with the given clearing behaviour.
    #[must_use]
    pub fn clearing(clear_on_destruction: bool) -> Self {
        Self {
            clear_on_destruction,
            ..Self::default()
        }
    }

    /// Normalize the configuration, applying defaults where limits are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.max_per_class == 0 {
            self.max_per_class = DEFAULT_MAX_PER_CLASS;
        }
        if self.max_buffer_words == 0 {
            self.max_buffer_words = DEFAULT_MAX_BUFFER_WORDS;
        }
        self
    }
}
