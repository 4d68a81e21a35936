//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use crate::handle::BlockHandle;

/// Why a [`BlockHandle`] was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleFault {
    /// The handle was issued by a different arena instance.
    ForeignArena,
    /// The block the handle referred to no longer exists in that form:
    /// it was absorbed by a neighbour, or the slot was reused.
    Stale,
    /// The block exists but is already free (double release).
    AlreadyFree,
}

impl fmt::Display for HandleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignArena => write!(f, "handle belongs to another arena"),
            Self::Stale => write!(f, "handle is stale"),
            Self::AlreadyFree => write!(f, "block is already free"),
        }
    }
}

/// Errors that can occur during arena operations.
///
/// Every variant is recoverable except `InvalidCapacity`, which prevents
/// the arena from being created at all. A failed `allocate` or `release`
/// leaves the block sequence untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Arena construction with a zero-sized address range.
    InvalidCapacity {
        /// The rejected capacity.
        total_memory: usize,
    },
    /// Allocation request for zero units.
    InvalidSize {
        /// The rejected request size.
        requested: usize,
    },
    /// No single free block is large enough for the request.
    AllocationFailed {
        /// Number of units requested.
        requested: usize,
        /// Size of the largest free block at the time of the request.
        largest_free: usize,
    },
    /// The handle does not identify a currently allocated block of this arena.
    InvalidHandle {
        /// The rejected handle.
        handle: BlockHandle,
        /// Which check the handle failed.
        fault: HandleFault,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { total_memory } => {
                write!(f, "invalid arena capacity: {total_memory} units")
            }
            Self::InvalidSize { requested } => {
                write!(f, "invalid allocation size: {requested} units")
            }
            Self::AllocationFailed {
                requested,
                largest_free,
            } => {
                write!(
                    f,
                    "allocation failed: requested {requested} units, largest free block {largest_free} units"
                )
            }
            Self::InvalidHandle { handle, fault } => {
                write!(f, "invalid handle {handle}: {fault}")
            }
        }
    }
}

impl Error for ArenaError {}

/// A broken structural invariant reported by
/// [`BlockArena::check_invariants`](crate::BlockArena::check_invariants).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The first block does not start at address 0.
    BadHead {
        /// Start address of the first block.
        start: usize,
    },
    /// A block does not begin where its predecessor ends.
    Gap {
        /// Address where the predecessor ends.
        expected: usize,
        /// Start address of the block found there.
        found: usize,
    },
    /// The last block does not end at `total_memory`.
    BadTail {
        /// Address where the last block ends.
        end: usize,
        /// Configured arena capacity.
        total_memory: usize,
    },
    /// A block of size zero.
    EmptyBlock {
        /// Start address of the empty block.
        start: usize,
    },
    /// Two neighbouring blocks are both free.
    AdjacentFree {
        /// Start address of the first of the pair.
        first: usize,
        /// Start address of the second of the pair.
        second: usize,
    },
    /// A `prev` link does not point back at the block's predecessor.
    BrokenBackLink {
        /// Start address of the block with the bad link.
        start: usize,
    },
    /// The number of reachable blocks disagrees with the live slot count.
    CountMismatch {
        /// Blocks reached by walking the sequence.
        walked: usize,
        /// Slots marked live.
        live: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadHead { start } => write!(f, "first block starts at {start}, not 0"),
            Self::Gap { expected, found } => {
                write!(f, "expected block at {expected}, found one at {found}")
            }
            Self::BadTail { end, total_memory } => {
                write!(f, "last block ends at {end}, arena ends at {total_memory}")
            }
            Self::EmptyBlock { start } => write!(f, "block at {start} has size 0"),
            Self::AdjacentFree { first, second } => {
                write!(f, "adjacent free blocks at {first} and {second}")
            }
            Self::BrokenBackLink { start } => {
                write!(f, "block at {start} has a broken prev link")
            }
            Self::CountMismatch { walked, live } => {
                write!(f, "walked {walked} blocks but {live} slots are live")
            }
        }
    }
}

impl Error for InvariantViolation {}
