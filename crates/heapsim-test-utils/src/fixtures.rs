//! Arena layout fixtures.
//!
//! A layout is a list of `(size, free)` pairs in address order. Because the
//! arena always coalesces neighbouring free blocks, a layout with two
//! adjacent free entries cannot be built and is rejected up front.

use heapsim_arena::{BlockArena, BlockHandle};

/// An arena built from a layout, plus the handle of every used block.
///
/// `handles[i]` is `Some` exactly when layout entry `i` is used.
pub struct LayoutArena {
    pub arena: BlockArena,
    pub handles: Vec<Option<BlockHandle>>,
}

impl LayoutArena {
    /// Handle of the used block at layout position `i`.
    ///
    /// # Panics
    ///
    /// Panics if position `i` is free.
    pub fn handle(&self, i: usize) -> BlockHandle {
        self.handles[i].unwrap_or_else(|| panic!("layout entry {i} is free"))
    }
}

/// Build an arena whose capacity is the sum of `layout` sizes and whose
/// blocks match `layout` exactly.
///
/// Every block is allocated front to back (first-fit always carves from
/// the free tail), then the entries marked free are released.
///
/// # Panics
///
/// Panics on an empty layout, a zero size, or two adjacent free entries.
pub fn arena_from_layout(layout: &[(usize, bool)]) -> LayoutArena {
    assert!(!layout.is_empty(), "layout must have at least one block");
    for pair in layout.windows(2) {
        assert!(
            !(pair[0].1 && pair[1].1),
            "adjacent free blocks would be coalesced: {layout:?}"
        );
    }

    let total: usize = layout.iter().map(|&(size, _)| size).sum();
    let mut arena = BlockArena::new(total).expect("layout total must be non-zero");
    let all: Vec<BlockHandle> = layout
        .iter()
        .map(|&(size, _)| arena.allocate(size).expect("layout block must fit"))
        .collect();

    let mut handles = Vec::with_capacity(layout.len());
    for (&(_, free), handle) in layout.iter().zip(all) {
        if free {
            arena.release(handle).expect("fresh handle must release");
            handles.push(None);
        } else {
            handles.push(Some(handle));
        }
    }
    LayoutArena { arena, handles }
}

/// The arena's blocks as `(start, size, free)` triples.
pub fn layout_of(arena: &BlockArena) -> Vec<(usize, usize, bool)> {
    arena.blocks().map(|b| (b.start, b.size, b.free)).collect()
}

/// Assert the arena's blocks equal `expected` and all invariants hold.
#[track_caller]
pub fn assert_layout(arena: &BlockArena, expected: &[(usize, usize, bool)]) {
    assert_eq!(layout_of(arena), expected, "unexpected block layout");
    if let Err(violation) = arena.check_invariants() {
        panic!("arena invariant violated: {violation}");
    }
}
