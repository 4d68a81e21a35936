//! Benchmark profiles for heapsim arenas.
//!
//! - [`fragmented_arena`]: alternating used/free blocks, the worst case for
//!   a first-fit scan.
//! - [`request_sizes`]: deterministic request sizes via seed.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use heapsim_arena::{ArenaError, BlockArena, BlockHandle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build an arena of `pairs` free/used block pairs of `block` units each,
/// followed by one free tail of `tail` units.
///
/// Every free hole is exactly `block` units, so any request larger than
/// `block` has to walk the whole sequence to reach the tail.
pub fn fragmented_arena(
    pairs: usize,
    block: usize,
    tail: usize,
) -> Result<(BlockArena, Vec<BlockHandle>), ArenaError> {
    let mut arena = BlockArena::new(pairs * 2 * block + tail)?;
    let mut used = Vec::with_capacity(pairs);
    let mut holes = Vec::with_capacity(pairs);
    for _ in 0..pairs {
        holes.push(arena.allocate(block)?);
        used.push(arena.allocate(block)?);
    }
    for hole in holes {
        arena.release(hole)?;
    }
    Ok((arena, used))
}

/// `count` request sizes drawn uniformly from `min..=max` with a seeded RNG.
pub fn request_sizes(seed: u64, count: usize, min: usize, max: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(min..=max)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragmented_arena_alternates() {
        let (arena, used) = fragmented_arena(4, 8, 100).unwrap();
        assert_eq!(used.len(), 4);
        assert_eq!(arena.block_count(), 9);
        assert_eq!(arena.free_block_count(), 5);
        assert_eq!(arena.largest_free(), 100);
        arena.check_invariants().unwrap();
    }

    #[test]
    fn request_sizes_are_deterministic_and_bounded() {
        let a = request_sizes(7, 64, 5, 50);
        assert_eq!(a, request_sizes(7, 64, 5, 50));
        assert!(a.iter().all(|&s| (5..=50).contains(&s)));
    }
}
