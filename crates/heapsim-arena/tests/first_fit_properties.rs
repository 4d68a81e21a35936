//! Integration tests: first-fit selection, splitting, coalescing, exhaustion
//! and handle validation observed through the public API only.

use heapsim_arena::{ArenaError, BlockArena, HandleFault};
use heapsim_test_utils::{apply_ops, arena_from_layout, assert_layout, layout_of, op_script};
use proptest::prelude::*;

// ── First-fit selection ─────────────────────────────────────────────

#[test]
fn first_fit_picks_lowest_adequate_block() {
    let mut built = arena_from_layout(&[(10, false), (20, true), (5, false), (50, true)]);
    let h = built.arena.allocate(15).unwrap();

    let info = built.arena.resolve(h).unwrap();
    assert_eq!((info.start, info.size), (10, 15));
    assert_layout(
        &built.arena,
        &[
            (0, 10, false),
            (10, 15, false),
            (25, 5, true),
            (30, 5, false),
            (35, 50, true),
        ],
    );
}

#[test]
fn first_fit_skips_blocks_that_are_too_small() {
    let mut built = arena_from_layout(&[(10, false), (20, true), (5, false), (50, true)]);
    let h = built.arena.allocate(21).unwrap();
    assert_eq!(built.arena.resolve(h).unwrap().start, 35);
    assert_layout(
        &built.arena,
        &[
            (0, 10, false),
            (10, 20, true),
            (30, 5, false),
            (35, 21, false),
            (56, 29, true),
        ],
    );
}

// ── Splitting ───────────────────────────────────────────────────────

#[test]
fn exact_size_allocation_keeps_block_count() {
    let mut built = arena_from_layout(&[(10, false), (20, true), (5, false)]);
    let before = built.arena.block_count();
    let _h = built.arena.allocate(20).unwrap();
    assert_eq!(built.arena.block_count(), before);
    assert_layout(
        &built.arena,
        &[(0, 10, false), (10, 20, false), (30, 5, false)],
    );
}

#[test]
fn smaller_allocation_adds_exactly_one_block() {
    let mut built = arena_from_layout(&[(10, false), (20, true), (5, false)]);
    let before = built.arena.block_count();
    let _h = built.arena.allocate(7).unwrap();
    assert_eq!(built.arena.block_count(), before + 1);
    assert_layout(
        &built.arena,
        &[(0, 10, false), (10, 7, false), (17, 13, true), (30, 5, false)],
    );
}

// ── Coalescing ──────────────────────────────────────────────────────

#[test]
fn release_between_two_free_neighbours_merges_all_three() {
    let mut built = arena_from_layout(&[(5, false), (10, true), (20, false), (30, true), (7, false)]);
    let middle = built.handle(2);
    built.arena.release(middle).unwrap();
    assert_layout(&built.arena, &[(0, 5, false), (5, 60, true), (65, 7, false)]);
    assert_eq!(built.arena.free_block_count(), 1);
}

#[test]
fn release_next_to_free_successor_only() {
    let mut built = arena_from_layout(&[(10, false), (10, false), (10, true)]);
    let h = built.handle(1);
    built.arena.release(h).unwrap();
    assert_layout(&built.arena, &[(0, 10, false), (10, 20, true)]);
}

#[test]
fn release_next_to_free_predecessor_only() {
    let mut built = arena_from_layout(&[(10, true), (10, false), (10, false)]);
    let h = built.handle(1);
    built.arena.release(h).unwrap();
    assert_layout(&built.arena, &[(0, 20, true), (20, 10, false)]);
}

#[test]
fn release_with_used_neighbours_does_not_merge() {
    let mut built = arena_from_layout(&[(10, false), (10, false), (10, false)]);
    let h = built.handle(1);
    built.arena.release(h).unwrap();
    assert_layout(&built.arena, &[(0, 10, false), (10, 10, true), (20, 10, false)]);
}

// ── Exhaustion ──────────────────────────────────────────────────────

#[test]
fn fragmented_free_space_does_not_satisfy_large_request() {
    let mut built = arena_from_layout(&[(10, true), (10, false), (10, true), (10, false), (10, true)]);
    assert_eq!(built.arena.stats().free, 30);
    let before = layout_of(&built.arena);
    assert_eq!(
        built.arena.allocate(11),
        Err(ArenaError::AllocationFailed {
            requested: 11,
            largest_free: 10,
        })
    );
    assert_eq!(layout_of(&built.arena), before);
}

// ── Round trip ──────────────────────────────────────────────────────

#[test]
fn round_trip_reuses_released_block() {
    let mut arena = BlockArena::new(100).unwrap();
    let first = arena.allocate(40).unwrap();
    let _second = arena.allocate(30).unwrap();
    arena.release(first).unwrap();
    assert_layout(&arena, &[(0, 40, true), (40, 30, false), (70, 30, true)]);

    let third = arena.allocate(35).unwrap();
    assert_eq!(arena.resolve(third).unwrap().start, 0);
    assert_layout(
        &arena,
        &[(0, 35, false), (35, 5, true), (40, 30, false), (70, 30, true)],
    );
}

// ── Handle validation ───────────────────────────────────────────────

#[test]
fn double_release_fails_every_time() {
    let mut arena = BlockArena::new(100).unwrap();
    let h = arena.allocate(25).unwrap();
    arena.release(h).unwrap();
    for _ in 0..3 {
        assert!(matches!(
            arena.release(h),
            Err(ArenaError::InvalidHandle { .. })
        ));
    }
    assert_layout(&arena, &[(0, 100, true)]);
}

#[test]
fn handle_from_other_arena_fails_every_time() {
    let mut a = BlockArena::new(100).unwrap();
    let mut b = BlockArena::new(100).unwrap();
    let from_a = a.allocate(10).unwrap();
    let _from_b = b.allocate(10).unwrap();
    for _ in 0..2 {
        assert_eq!(
            b.release(from_a),
            Err(ArenaError::InvalidHandle {
                handle: from_a,
                fault: HandleFault::ForeignArena,
            })
        );
    }
    assert_layout(&b, &[(0, 10, false), (10, 90, true)]);
}

#[test]
fn handle_to_absorbed_block_is_rejected() {
    let mut built = arena_from_layout(&[(10, true), (10, false), (10, false)]);
    let absorbed = built.handle(1);
    built.arena.release(absorbed).unwrap();
    // The freed block was merged into its predecessor at address 0.
    assert!(built.arena.resolve(absorbed).is_err());
    assert!(built.arena.release(absorbed).is_err());
}

// ── Properties under random churn ───────────────────────────────────

proptest! {
    #[test]
    fn invariants_and_conservation_hold(ops in op_script(48, 300)) {
        let mut arena = BlockArena::new(1000).unwrap();
        let outstanding = apply_ops(&mut arena, &ops, |arena, _| {
            assert_eq!(arena.check_invariants(), Ok(()));
            assert_eq!(arena.blocks().map(|b| b.size).sum::<usize>(), 1000);
        });

        let used: usize = outstanding
            .iter()
            .map(|&h| arena.resolve(h).unwrap().size)
            .sum();
        prop_assert_eq!(used, arena.stats().used);
    }

    #[test]
    fn releasing_everything_restores_single_block(ops in op_script(64, 100)) {
        let mut arena = BlockArena::new(2048).unwrap();
        let outstanding = apply_ops(&mut arena, &ops, |_, _| {});
        for h in outstanding {
            arena.release(h).unwrap();
        }
        prop_assert_eq!(layout_of(&arena), vec![(0, 2048, true)]);
    }

    #[test]
    fn allocation_lands_in_first_adequate_free_block(
        ops in op_script(32, 80),
        request in 1usize..64,
    ) {
        let mut arena = BlockArena::new(1024).unwrap();
        let _ = apply_ops(&mut arena, &ops, |_, _| {});
        let expected = arena
            .blocks()
            .find(|b| b.free && b.size >= request)
            .map(|b| b.start);
        let got = arena.allocate(request).ok().map(|h| arena.resolve(h).unwrap().start);
        prop_assert_eq!(got, expected);
    }
}
