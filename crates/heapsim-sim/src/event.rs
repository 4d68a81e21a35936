//! Events emitted by the workload driver.

use std::fmt;

use heapsim_arena::BlockHandle;

/// One observable action taken by a [`Simulation`](crate::Simulation) step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// An allocation attempt succeeded.
    Allocated {
        /// 1-based attempt number.
        attempt: u32,
        /// Units requested.
        size: usize,
        /// Start address of the new block.
        start: usize,
        /// Handle to the new block.
        handle: BlockHandle,
    },
    /// An allocation attempt found no free block large enough.
    AllocationFailed {
        /// 1-based attempt number.
        attempt: u32,
        /// Units requested.
        size: usize,
        /// Largest free block at the time of the attempt.
        largest_free: usize,
    },
    /// An outstanding block was released.
    Released {
        /// 1-based release number.
        release: u32,
        /// Start address of the released block.
        start: usize,
        /// Size of the released block.
        size: usize,
    },
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocated { attempt, size, .. } => {
                write!(f, "Alloc attempt {attempt}: size {size}")
            }
            Self::AllocationFailed { attempt, size, .. } => {
                write!(f, "Alloc attempt {attempt}: size {size} (no suitable block)")
            }
            Self::Released { release, start, .. } => {
                write!(f, "Free {release}: block starting at {start}")
            }
        }
    }
}
