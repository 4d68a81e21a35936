//! Block records and their read-only view.

/// One slot in the arena's block table.
///
/// Slots are recycled: when a block is absorbed by a neighbour its slot is
/// marked dead and pushed onto the arena's vacant list. `prev`/`next` are
/// slot indices and only meaningful while `live` is set.
#[derive(Clone, Debug)]
pub(crate) struct Block {
    pub start: usize,
    pub size: usize,
    pub free: bool,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    /// Stamp assigned on creation and on every allocation.
    pub generation: u64,
    pub live: bool,
}

impl Block {
    pub fn info(&self) -> BlockInfo {
        BlockInfo {
            start: self.start,
            size: self.size,
            free: self.free,
        }
    }
}

/// Snapshot of a single block as seen by traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockInfo {
    /// First address covered by the block.
    pub start: usize,
    /// Number of address units covered.
    pub size: usize,
    /// Whether the block is available for allocation.
    pub free: bool,
}

impl BlockInfo {
    /// One past the last address covered by the block.
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    /// Last address covered by the block (inclusive).
    pub fn last(&self) -> usize {
        self.end() - 1
    }
}
