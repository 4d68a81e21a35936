//! Occupancy summary for an arena.

/// Point-in-time occupancy figures, computed by
/// [`BlockArena::stats`](crate::BlockArena::stats).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Arena capacity in address units.
    pub total: usize,
    /// Units covered by used blocks.
    pub used: usize,
    /// Units covered by free blocks.
    pub free: usize,
    /// Number of blocks in the sequence.
    pub block_count: usize,
    /// Number of free blocks in the sequence.
    pub free_block_count: usize,
    /// Size of the largest free block (0 when the arena is full).
    pub largest_free: usize,
}

impl ArenaStats {
    /// External fragmentation: `1 - largest_free / free`.
    ///
    /// 0.0 when all free space is one block (or nothing is free), approaching
    /// 1.0 as free space splinters into many small blocks.
    pub fn fragmentation(&self) -> f64 {
        if self.free == 0 {
            return 0.0;
        }
        1.0 - self.largest_free as f64 / self.free as f64
    }

    /// Fraction of the arena currently in use.
    pub fn utilization(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f64 / self.total as f64
    }
}
