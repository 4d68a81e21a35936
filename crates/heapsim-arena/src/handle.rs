//! Block handles and arena identity.
//!
//! A [`BlockHandle`] names one allocation. It is generation-scoped: the
//! `generation` stamp lets the arena detect stale handles in O(1) without
//! tracking which handles callers still hold.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
static ARENA_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a [`BlockArena`](crate::BlockArena).
///
/// Two arenas never share an ID within a process, even if they have the
/// same capacity and layout, so a handle from one arena is always rejected
/// by another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique arena ID. Thread-safe.
    pub fn next() -> Self {
        Self(ARENA_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning reference to an allocated block.
///
/// Handles are plain `Copy` values. They never keep a block alive and
/// cannot mutate it; they only name it when calling back into the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct BlockHandle {
    /// Arena that issued this handle.
    pub(crate) arena: ArenaId,
    /// Slot index of the block.
    pub(crate) index: usize,
    /// Generation stamp of the block when it was handed out.
    pub(crate) generation: u64,
}

impl BlockHandle {
    pub(crate) fn new(arena: ArenaId, index: usize, generation: u64) -> Self {
        Self {
            arena,
            index,
            generation,
        }
    }

    /// The arena that issued this handle.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// The generation stamp carried by this handle.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockHandle(arena={}, slot={}, gen={})",
            self.arena, self.index, self.generation
        )
    }
}
