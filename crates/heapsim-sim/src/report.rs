//! Text rendering of an arena's block sequence.
//!
//! ```text
//! Memory:
//! [0, 39] size=40 used
//! [40, 999] size=960 free
//! ----------------------------------------
//! ```

use std::fmt;

use heapsim_arena::{BlockArena, BlockInfo, Blocks};

/// Width of the rule printed after each map.
pub const RULE_WIDTH: usize = 40;

/// One block formatted as `[start, last] size=<n> <free|used>`.
#[derive(Clone, Copy, Debug)]
pub struct BlockLine(pub BlockInfo);

impl fmt::Display for BlockLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        let status = if b.free { "free" } else { "used" };
        write!(f, "[{}, {}] size={} {}", b.start, b.last(), b.size, status)
    }
}

/// Full memory map: header, one [`BlockLine`] per block, trailing rule.
///
/// Holds a cloneable block iterator so the map can be formatted more than
/// once; for a live arena use [`MemoryMap::of`], for a copied snapshot use
/// [`MemoryMap::new`] over the slice.
#[derive(Clone, Debug)]
pub struct MemoryMap<I> {
    blocks: I,
}

impl<'a> MemoryMap<Blocks<'a>> {
    /// Map of the arena's current blocks.
    pub fn of(arena: &'a BlockArena) -> Self {
        Self {
            blocks: arena.blocks(),
        }
    }
}

impl<I> MemoryMap<I>
where
    I: Iterator<Item = BlockInfo> + Clone,
{
    /// Map of an arbitrary address-ordered block sequence.
    pub fn new(blocks: I) -> Self {
        Self { blocks }
    }
}

impl<I> fmt::Display for MemoryMap<I>
where
    I: Iterator<Item = BlockInfo> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory:")?;
        for block in self.blocks.clone() {
            writeln!(f, "{}", BlockLine(block))?;
        }
        write!(f, "{}", "-".repeat(RULE_WIDTH))
    }
}
