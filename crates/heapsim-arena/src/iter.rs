//! Address-ordered traversal of the block sequence.

use std::iter::FusedIterator;

use crate::block::{Block, BlockInfo};

/// Iterator over the arena's blocks in ascending address order.
///
/// Created by [`BlockArena::blocks`](crate::BlockArena::blocks). Borrowing
/// the arena for the iterator's lifetime guarantees the walk cannot observe
/// a half-finished split or merge.
#[derive(Clone, Debug)]
pub struct Blocks<'a> {
    slots: &'a [Block],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Blocks<'a> {
    pub(crate) fn new(slots: &'a [Block], head: usize, count: usize) -> Self {
        Self {
            slots,
            cursor: Some(head),
            remaining: count,
        }
    }
}

impl Iterator for Blocks<'_> {
    type Item = BlockInfo;

    fn next(&mut self) -> Option<BlockInfo> {
        if self.remaining == 0 {
            return None;
        }
        let block = &self.slots[self.cursor?];
        self.cursor = block.next;
        self.remaining -= 1;
        Some(block.info())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Blocks<'_> {}

impl FusedIterator for Blocks<'_> {}
