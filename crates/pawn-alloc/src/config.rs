//! Arena configuration parameters.

use pawn_core::{ConfigError, COLD_ARENA_CAPACITY, HOT_ARENA_CAPACITY};

/// Configuration for a [`LinearAllocator`](crate::LinearAllocator).
///
/// Validated when the arena is built; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes.
    ///
    /// Default: [`HOT_ARENA_CAPACITY`] (64 KiB).
    pub capacity: usize,

    /// Whether resets triggered by the arena itself (an [`ArenaScope`]
    /// ending, or deallocating `None`) also zero the backing buffer.
    ///
    /// Explicit [`LinearAllocator::clear`](crate::LinearAllocator::clear)
    /// calls choose for themselves. Default: `false`.
    ///
    /// [`ArenaScope`]: crate::ArenaScope
    pub zero_on_clear: bool,
}

impl ArenaConfig {
    /// A config for an arena of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            zero_on_clear: false,
        }
    }

    /// The per-frame arena preset (64 KiB).
    pub fn hot() -> Self {
        Self::new(HOT_ARENA_CAPACITY)
    }

    /// The long-lived arena preset (256 KiB).
    pub fn cold() -> Self {
        Self::new(COLD_ARENA_CAPACITY)
    }

    /// Builder-style setter for [`ArenaConfig::zero_on_clear`].
    pub fn zero_on_clear(mut self, zero: bool) -> Self {
        self.zero_on_clear = zero;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.capacity > isize::MAX as usize {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::hot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_hot_64k() {
        let config = ArenaConfig::default();
        assert_eq!(config.capacity, 64 * 1024);
        assert!(!config.zero_on_clear);
    }

    #[test]
    fn cold_is_256k() {
        assert_eq!(ArenaConfig::cold().capacity, 256 * 1024);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(ArenaConfig::new(0).validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn huge_capacity_rejected() {
        let config = ArenaConfig::new(usize::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityTooLarge { .. })
        ));
    }
}
