//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for a [`BlockArena`](crate::BlockArena).
///
/// Validated at construction; the arena's capacity never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the managed address range, in address units.
    ///
    /// Must be at least 1.
    pub total_memory: usize,

    /// Number of block slots to reserve up front.
    ///
    /// Only a capacity hint for the slot vector; the block count still grows
    /// and shrinks freely.
    pub block_capacity_hint: usize,
}

impl ArenaConfig {
    /// Default slot reservation.
    pub const DEFAULT_BLOCK_CAPACITY_HINT: usize = 64;

    /// Create a config for an arena of `total_memory` units.
    pub fn new(total_memory: usize) -> Self {
        Self {
            total_memory,
            block_capacity_hint: Self::DEFAULT_BLOCK_CAPACITY_HINT,
        }
    }

    /// Check that the config can back an arena.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.total_memory == 0 {
            return Err(ArenaError::InvalidCapacity {
                total_memory: self.total_memory,
            });
        }
        Ok(())
    }
}
