//! Operation scripts for property-based tests.

use heapsim_arena::{BlockArena, BlockHandle};
use proptest::prelude::*;

/// One scripted arena call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Request this many units.
    Allocate(usize),
    /// Release the outstanding handle at this position (modulo the number
    /// outstanding). Skipped when nothing is outstanding.
    Release(usize),
}

/// Strategy producing up to `max_len` ops with request sizes in `1..=max_size`.
pub fn op_script(max_size: usize, max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (1..=max_size).prop_map(Op::Allocate),
        any::<usize>().prop_map(Op::Release),
    ];
    proptest::collection::vec(op, 1..=max_len)
}

/// Apply `ops` to `arena`, calling `after_each` after every op.
///
/// Returns the handles still outstanding at the end. Failed allocations
/// are ignored; a release of a tracked handle must succeed.
///
/// # Panics
///
/// Panics if the arena rejects a handle it issued and that was never
/// released.
pub fn apply_ops(
    arena: &mut BlockArena,
    ops: &[Op],
    mut after_each: impl FnMut(&BlockArena, &Op),
) -> Vec<BlockHandle> {
    let mut outstanding = Vec::new();
    for op in ops {
        match *op {
            Op::Allocate(size) => {
                if let Ok(handle) = arena.allocate(size) {
                    outstanding.push(handle);
                }
            }
            Op::Release(pick) => {
                if !outstanding.is_empty() {
                    let handle = outstanding.swap_remove(pick % outstanding.len());
                    if let Err(e) = arena.release(handle) {
                        panic!("release of outstanding handle failed: {e}");
                    }
                }
            }
        }
        after_each(arena, op);
    }
    outstanding
}
