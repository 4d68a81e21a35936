//! The first-fit block arena.
//!
//! [`BlockArena`] partitions `[0, total_memory)` into an address-ordered,
//! doubly-linked sequence of blocks stored in a slot table. Allocation walks
//! the sequence from address 0 and takes the first free block that is large
//! enough, splitting off any remainder. Release marks the block free and
//! immediately merges it with free neighbours, so no two adjacent blocks are
//! ever both free.
//!
//! ```text
//! allocate(15) on  [0,10) used | [10,30) free | [30,35) used | [35,85) free
//!             ->   [0,10) used | [10,25) used | [25,30) free | [30,35) used | [35,85) free
//! ```

use crate::block::{Block, BlockInfo};
use crate::config::ArenaConfig;
use crate::error::{ArenaError, HandleFault, InvariantViolation};
use crate::handle::{ArenaId, BlockHandle};
use crate::iter::Blocks;
use crate::stats::ArenaStats;

/// A fixed-capacity simulated heap with first-fit allocation.
///
/// All operations are O(n) in the current number of blocks and run to
/// completion before returning. Mutating operations take `&mut self`; wrap
/// the arena in a [`SharedArena`](crate::SharedArena) to share it between
/// threads.
///
/// Cloning copies the block layout into a new arena with its own
/// [`ArenaId`]. Handles from either copy are foreign to the other, including
/// handles issued before the clone.
#[derive(Debug)]
pub struct BlockArena {
    id: ArenaId,
    total_memory: usize,
    /// Block table. Dead slots stay in place until reused.
    slots: Vec<Block>,
    /// Indices of dead slots available for reuse.
    vacant: Vec<usize>,
    /// Slot of the block starting at address 0. That block has no
    /// predecessor, so it is never absorbed and the index never changes.
    head: usize,
    next_generation: u64,
}

impl BlockArena {
    /// Create an arena managing `total_memory` units as one free block.
    ///
    /// Returns `Err(ArenaError::InvalidCapacity)` if `total_memory` is zero.
    pub fn new(total_memory: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(total_memory))
    }

    /// Create an arena from an explicit [`ArenaConfig`].
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut slots = Vec::with_capacity(config.block_capacity_hint.max(1));
        slots.push(Block {
            start: 0,
            size: config.total_memory,
            free: true,
            prev: None,
            next: None,
            generation: 0,
            live: true,
        });
        Ok(Self {
            id: ArenaId::next(),
            total_memory: config.total_memory,
            slots,
            vacant: Vec::new(),
            head: 0,
            next_generation: 1,
        })
    }

    /// This arena's identity, as carried by every handle it issues.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Capacity of the managed address range.
    pub fn total_memory(&self) -> usize {
        self.total_memory
    }

    /// Number of blocks currently partitioning the arena.
    pub fn block_count(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    /// Number of free blocks.
    pub fn free_block_count(&self) -> usize {
        self.blocks().filter(|b| b.free).count()
    }

    /// Size of the largest free block, or 0 if the arena is full.
    pub fn largest_free(&self) -> usize {
        self.blocks()
            .filter(|b| b.free)
            .map(|b| b.size)
            .max()
            .unwrap_or(0)
    }

    /// Allocate `size` units from the lowest-addressed free block that fits.
    ///
    /// If the chosen block is larger than `size` it is split: the prefix
    /// becomes the allocation and the remainder stays free, directly after it.
    ///
    /// # Errors
    ///
    /// - `InvalidSize` if `size` is zero.
    /// - `AllocationFailed` if no single free block has `size` units, even
    ///   when the free blocks together would. The arena is left unchanged.
    pub fn allocate(&mut self, size: usize) -> Result<BlockHandle, ArenaError> {
        if size == 0 {
            return Err(ArenaError::InvalidSize { requested: size });
        }
        let Some(index) = self.first_fit(size) else {
            return Err(ArenaError::AllocationFailed {
                requested: size,
                largest_free: self.largest_free(),
            });
        };

        if self.slots[index].size > size {
            self.split(index, size);
        }

        let generation = self.stamp();
        let block = &mut self.slots[index];
        block.free = false;
        block.generation = generation;
        Ok(BlockHandle::new(self.id, index, generation))
    }

    /// Return a block to the arena and coalesce it with free neighbours.
    ///
    /// The successor is merged first, then the (possibly grown) block is
    /// merged into its predecessor. Handles to any block absorbed this way
    /// become stale.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the handle came from another arena, refers to a
    /// block that no longer exists, or refers to a block that is already
    /// free. The arena is left unchanged.
    pub fn release(&mut self, handle: BlockHandle) -> Result<(), ArenaError> {
        let index = self.validate(handle)?;
        self.slots[index].free = true;

        if let Some(next) = self.slots[index].next {
            if self.slots[next].free {
                self.absorb_next(index);
            }
        }
        if let Some(prev) = self.slots[index].prev {
            if self.slots[prev].free {
                self.absorb_next(prev);
            }
        }
        Ok(())
    }

    /// Look up the block a handle refers to.
    ///
    /// Fails with `InvalidHandle` under the same conditions as [`release`](Self::release).
    pub fn resolve(&self, handle: BlockHandle) -> Result<BlockInfo, ArenaError> {
        let index = self.validate(handle)?;
        Ok(self.slots[index].info())
    }

    /// Whether `handle` currently names an allocated block of this arena.
    pub fn contains(&self, handle: BlockHandle) -> bool {
        self.validate(handle).is_ok()
    }

    /// Walk the blocks in ascending address order.
    ///
    /// The iterator is lazy and can be recreated at any time to restart the
    /// walk; it always reflects the arena as of the call.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks::new(&self.slots, self.head, self.block_count())
    }

    /// Compute occupancy figures in a single pass.
    pub fn stats(&self) -> ArenaStats {
        let mut stats = ArenaStats {
            total: self.total_memory,
            ..ArenaStats::default()
        };
        for block in self.blocks() {
            stats.block_count += 1;
            if block.free {
                stats.free += block.size;
                stats.free_block_count += 1;
                stats.largest_free = stats.largest_free.max(block.size);
            } else {
                stats.used += block.size;
            }
        }
        stats
    }

    /// Verify the structural invariants of the block sequence.
    ///
    /// Returns the first violation found. The walk is bounded by the live
    /// slot count, so a corrupted cycle is reported rather than looped on.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let live = self.block_count();
        let mut walked = 0usize;
        let mut expected_start = 0usize;
        let mut prev: Option<usize> = None;
        let mut prev_free_start: Option<usize> = None;
        let mut cursor = Some(self.head);

        while let Some(index) = cursor {
            let block = &self.slots[index];
            if walked == live {
                return Err(InvariantViolation::CountMismatch {
                    walked: walked + 1,
                    live,
                });
            }
            if walked == 0 && block.start != 0 {
                return Err(InvariantViolation::BadHead { start: block.start });
            }
            if block.start != expected_start {
                return Err(InvariantViolation::Gap {
                    expected: expected_start,
                    found: block.start,
                });
            }
            if block.size == 0 {
                return Err(InvariantViolation::EmptyBlock { start: block.start });
            }
            if !block.live || block.prev != prev {
                return Err(InvariantViolation::BrokenBackLink { start: block.start });
            }
            if let (Some(first), true) = (prev_free_start, block.free) {
                return Err(InvariantViolation::AdjacentFree {
                    first,
                    second: block.start,
                });
            }

            walked += 1;
            expected_start = block.start + block.size;
            prev = Some(index);
            prev_free_start = block.free.then_some(block.start);
            cursor = block.next;
        }

        if expected_start != self.total_memory {
            return Err(InvariantViolation::BadTail {
                end: expected_start,
                total_memory: self.total_memory,
            });
        }
        if walked != live {
            return Err(InvariantViolation::CountMismatch { walked, live });
        }
        Ok(())
    }

    fn first_fit(&self, size: usize) -> Option<usize> {
        let mut cursor = Some(self.head);
        while let Some(index) = cursor {
            let block = &self.slots[index];
            if block.free && block.size >= size {
                return Some(index);
            }
            cursor = block.next;
        }
        None
    }

    /// Shrink the block at `index` to `size` and splice a free remainder
    /// in directly after it. Requires `size < slots[index].size`.
    fn split(&mut self, index: usize, size: usize) {
        let generation = self.stamp();
        let (start, old_size, old_next) = {
            let block = &self.slots[index];
            (block.start, block.size, block.next)
        };

        let remainder = self.insert_slot(Block {
            start: start + size,
            size: old_size - size,
            free: true,
            prev: Some(index),
            next: old_next,
            generation,
            live: true,
        });
        if let Some(next) = old_next {
            self.slots[next].prev = Some(remainder);
        }

        let block = &mut self.slots[index];
        block.size = size;
        block.next = Some(remainder);
    }

    /// Merge the successor of `index` into it and retire the successor's slot.
    fn absorb_next(&mut self, index: usize) {
        let Some(next) = self.slots[index].next else {
            return;
        };
        let (size, after) = {
            let victim = &mut self.slots[next];
            victim.live = false;
            victim.prev = None;
            (victim.size, victim.next.take())
        };

        let block = &mut self.slots[index];
        block.size += size;
        block.next = after;
        if let Some(after) = after {
            self.slots[after].prev = Some(index);
        }
        self.vacant.push(next);
    }

    fn insert_slot(&mut self, block: Block) -> usize {
        if let Some(index) = self.vacant.pop() {
            self.slots[index] = block;
            index
        } else {
            self.slots.push(block);
            self.slots.len() - 1
        }
    }

    fn stamp(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Map a handle to the slot of a live, allocated block.
    fn validate(&self, handle: BlockHandle) -> Result<usize, ArenaError> {
        let reject = |fault| ArenaError::InvalidHandle { handle, fault };
        if handle.arena != self.id {
            return Err(reject(HandleFault::ForeignArena));
        }
        let block = self
            .slots
            .get(handle.index)
            .filter(|b| b.live && b.generation == handle.generation)
            .ok_or_else(|| reject(HandleFault::Stale))?;
        if block.free {
            return Err(reject(HandleFault::AlreadyFree));
        }
        Ok(handle.index)
    }
}

impl Clone for BlockArena {
    fn clone(&self) -> Self {
        Self {
            id: ArenaId::next(),
            total_memory: self.total_memory,
            slots: self.slots.clone(),
            vacant: self.vacant.clone(),
            head: self.head,
            next_generation: self.next_generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(arena: &BlockArena) -> Vec<(usize, usize, bool)> {
        arena.blocks().map(|b| (b.start, b.size, b.free)).collect()
    }

    #[test]
    fn new_arena_is_one_free_block() {
        let arena = BlockArena::new(1000).unwrap();
        assert_eq!(layout(&arena), vec![(0, 1000, true)]);
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.largest_free(), 1000);
        arena.check_invariants().unwrap();
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            BlockArena::new(0).unwrap_err(),
            ArenaError::InvalidCapacity { total_memory: 0 }
        );
    }

    #[test]
    fn zero_size_request_is_rejected() {
        let mut arena = BlockArena::new(10).unwrap();
        assert_eq!(
            arena.allocate(0).unwrap_err(),
            ArenaError::InvalidSize { requested: 0 }
        );
        assert_eq!(layout(&arena), vec![(0, 10, true)]);
    }

    #[test]
    fn allocate_splits_and_returns_prefix() {
        let mut arena = BlockArena::new(100).unwrap();
        let h = arena.allocate(30).unwrap();
        assert_eq!(layout(&arena), vec![(0, 30, false), (30, 70, true)]);
        let info = arena.resolve(h).unwrap();
        assert_eq!((info.start, info.size, info.free), (0, 30, false));
    }

    #[test]
    fn exact_fit_does_not_split() {
        let mut arena = BlockArena::new(50).unwrap();
        let _h = arena.allocate(50).unwrap();
        assert_eq!(layout(&arena), vec![(0, 50, false)]);
        assert_eq!(arena.largest_free(), 0);
    }

    #[test]
    fn exhaustion_leaves_arena_unchanged() {
        let mut arena = BlockArena::new(40).unwrap();
        let _a = arena.allocate(30).unwrap();
        let before = layout(&arena);
        assert_eq!(
            arena.allocate(11).unwrap_err(),
            ArenaError::AllocationFailed {
                requested: 11,
                largest_free: 10,
            }
        );
        assert_eq!(layout(&arena), before);
    }

    #[test]
    fn release_merges_successor() {
        let mut arena = BlockArena::new(100).unwrap();
        let a = arena.allocate(20).unwrap();
        arena.release(a).unwrap();
        assert_eq!(layout(&arena), vec![(0, 100, true)]);
        arena.check_invariants().unwrap();
    }

    #[test]
    fn release_merges_both_neighbours() {
        let mut arena = BlockArena::new(60).unwrap();
        let a = arena.allocate(20).unwrap();
        let b = arena.allocate(20).unwrap();
        let c = arena.allocate(20).unwrap();
        arena.release(a).unwrap();
        arena.release(c).unwrap();
        assert_eq!(
            layout(&arena),
            vec![(0, 20, true), (20, 20, false), (40, 20, true)]
        );
        arena.release(b).unwrap();
        assert_eq!(layout(&arena), vec![(0, 60, true)]);
        assert_eq!(arena.block_count(), 1);
        arena.check_invariants().unwrap();
    }

    #[test]
    fn double_release_is_rejected() {
        let mut arena = BlockArena::new(100).unwrap();
        let a = arena.allocate(10).unwrap();
        let _b = arena.allocate(10).unwrap();
        arena.release(a).unwrap();
        for _ in 0..2 {
            assert!(matches!(
                arena.release(a),
                Err(ArenaError::InvalidHandle {
                    fault: HandleFault::AlreadyFree,
                    ..
                })
            ));
        }
    }

    #[test]
    fn absorbed_handle_is_stale() {
        let mut arena = BlockArena::new(30).unwrap();
        let a = arena.allocate(10).unwrap();
        let b = arena.allocate(10).unwrap();
        arena.release(a).unwrap();
        // b merges into a's free block; b's slot is retired.
        arena.release(b).unwrap();
        assert!(matches!(
            arena.release(b),
            Err(ArenaError::InvalidHandle {
                fault: HandleFault::Stale,
                ..
            })
        ));
    }

    #[test]
    fn reallocated_block_does_not_accept_old_handle() {
        let mut arena = BlockArena::new(20).unwrap();
        let a = arena.allocate(20).unwrap();
        arena.release(a).unwrap();
        let b = arena.allocate(20).unwrap();
        assert_ne!(a, b);
        assert!(!arena.contains(a));
        assert!(arena.contains(b));
        assert!(arena.release(a).is_err());
        assert!(arena.resolve(b).is_ok());
    }

    #[test]
    fn recycled_slot_gets_fresh_generation() {
        let mut arena = BlockArena::new(30).unwrap();
        let a = arena.allocate(10).unwrap();
        let b = arena.allocate(10).unwrap();
        arena.release(a).unwrap();
        arena.release(b).unwrap();
        // The slot b lived in is vacant now; the next split reuses it.
        let c = arena.allocate(5).unwrap();
        let d = arena.allocate(5).unwrap();
        assert!(!arena.contains(b));
        assert!(arena.contains(c));
        assert!(arena.contains(d));
        arena.check_invariants().unwrap();
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let mut first = BlockArena::new(100).unwrap();
        let mut second = BlockArena::new(100).unwrap();
        let h = first.allocate(10).unwrap();
        let _same_shape = second.allocate(10).unwrap();
        assert!(matches!(
            second.release(h),
            Err(ArenaError::InvalidHandle {
                fault: HandleFault::ForeignArena,
                ..
            })
        ));
        assert!(first.contains(h));
    }

    #[test]
    fn clone_gets_fresh_identity() {
        let mut original = BlockArena::new(100).unwrap();
        let before = original.allocate(20).unwrap();
        let mut copy = original.clone();
        assert_ne!(original.id(), copy.id());
        assert_eq!(
            copy.blocks().collect::<Vec<_>>(),
            original.blocks().collect::<Vec<_>>()
        );

        // Both copies now issue handles with the same slot and generation.
        let from_original = original.allocate(10).unwrap();
        let from_copy = copy.allocate(60).unwrap();
        assert_eq!(from_original.arena(), original.id());
        for h in [before, from_original] {
            assert!(matches!(
                copy.release(h),
                Err(ArenaError::InvalidHandle {
                    fault: HandleFault::ForeignArena,
                    ..
                })
            ));
        }
        assert!(copy.contains(from_copy));
        assert_eq!(copy.stats().used, 80);
        copy.check_invariants().unwrap();
    }

    #[test]
    fn blocks_iterator_is_exact_and_restartable() {
        let mut arena = BlockArena::new(100).unwrap();
        let _a = arena.allocate(10).unwrap();
        let _b = arena.allocate(10).unwrap();
        let iter = arena.blocks();
        assert_eq!(iter.len(), 3);
        let first: Vec<_> = arena.blocks().collect();
        let second: Vec<_> = arena.blocks().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn stats_track_occupancy() {
        let mut arena = BlockArena::new(100).unwrap();
        let a = arena.allocate(10).unwrap();
        let _b = arena.allocate(20).unwrap();
        arena.release(a).unwrap();
        let stats = arena.stats();
        assert_eq!(stats.total, 100);
        assert_eq!(stats.used, 20);
        assert_eq!(stats.free, 80);
        assert_eq!(stats.block_count, 3);
        assert_eq!(stats.free_block_count, 2);
        assert_eq!(stats.largest_free, 70);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn invariants_hold_under_churn(
                ops in proptest::collection::vec((any::<bool>(), 1usize..64, any::<usize>()), 1..200),
            ) {
                let mut arena = BlockArena::new(512).unwrap();
                let mut live: Vec<BlockHandle> = Vec::new();
                for (alloc, size, pick) in ops {
                    if alloc || live.is_empty() {
                        if let Ok(h) = arena.allocate(size) {
                            live.push(h);
                        }
                    } else {
                        let h = live.swap_remove(pick % live.len());
                        prop_assert!(arena.release(h).is_ok());
                    }
                    prop_assert_eq!(arena.check_invariants(), Ok(()));
                    let total: usize = arena.blocks().map(|b| b.size).sum();
                    prop_assert_eq!(total, 512);
                }
            }

            #[test]
            fn released_handles_never_validate_again(
                sizes in proptest::collection::vec(1usize..32, 1..20),
            ) {
                let mut arena = BlockArena::new(1024).unwrap();
                let handles: Vec<_> = sizes
                    .iter()
                    .filter_map(|&s| arena.allocate(s).ok())
                    .collect();
                for &h in &handles {
                    arena.release(h).unwrap();
                }
                for &h in &handles {
                    prop_assert!(!arena.contains(h));
                    prop_assert!(arena.release(h).is_err());
                }
                prop_assert_eq!(arena.block_count(), 1);
            }
        }
    }
}
