//! Slot table configuration, validation, and error types.
//!
//! [`TableConfig`] is the builder-input for constructing a
//! [`SlotTable`](crate::SlotTable). [`validate()`](TableConfig::validate)
//! checks structural invariants before the table allocates its slots.

use std::error::Error;
use std::fmt;
use std::num::NonZeroUsize;

/// Fallback slot count when CPU detection fails.
const DEFAULT_SLOT_COUNT: usize = 8;

/// Configuration for a [`SlotTable`](crate::SlotTable).
///
/// The slot count is fixed for the life of the table: slots are the unit
/// of sharding locality, enumerated in a fixed order by the pause
/// protocol, and never added or removed after construction.
#[derive(Clone, Debug)]
pub struct TableConfig {
    /// Number of slots. Threads are multiplexed onto slots by a stable
    /// hash of their thread ID, so this also bounds the parallelism the
    /// update path can exploit. Must be nonzero.
    pub slot_count: usize,
}

impl Default for TableConfig {
    /// One slot per logical CPU, matching the parallelism the host can
    /// actually deliver. Falls back to 8 if detection fails.
    fn default() -> Self {
        Self {
            slot_count: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(DEFAULT_SLOT_COUNT),
        }
    }
}

impl TableConfig {
    /// Create a config with an explicit slot count.
    pub fn with_slots(slot_count: usize) -> Self {
        Self { slot_count }
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroSlots`] if `slot_count` is zero — a
    /// table with no slots could never host a shard.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_count == 0 {
            return Err(ConfigError::ZeroSlots);
        }
        Ok(())
    }
}

/// Errors from slot table construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured slot count was zero.
    ZeroSlots,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSlots => write!(f, "slot count must be nonzero"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TableConfig::default();
        assert!(config.slot_count >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_slots_rejected() {
        let config = TableConfig::with_slots(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSlots));
    }

    #[test]
    fn explicit_slot_count_accepted() {
        let config = TableConfig::with_slots(3);
        assert!(config.validate().is_ok());
        assert_eq!(config.slot_count, 3);
    }

    #[test]
    fn config_error_displays() {
        assert_eq!(ConfigError::ZeroSlots.to_string(), "slot count must be nonzero");
    }
}
