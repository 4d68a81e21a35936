//! heapsim: a simulated heap allocator over a fixed-size address range.
//!
//! This is the facade crate that re-exports the public API of the
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use heapsim::prelude::*;
//!
//! let mut arena = BlockArena::new(100).unwrap();
//! let first = arena.allocate(40).unwrap();
//! let _second = arena.allocate(30).unwrap();
//! arena.release(first).unwrap();
//!
//! // First-fit reuses the hole at address 0 and splits off the rest.
//! let third = arena.allocate(35).unwrap();
//! assert_eq!(arena.resolve(third).unwrap().start, 0);
//!
//! let layout: Vec<_> = arena.blocks().map(|b| (b.start, b.size, b.free)).collect();
//! assert_eq!(
//!     layout,
//!     vec![(0, 35, false), (35, 5, true), (40, 30, false), (70, 30, true)]
//! );
//!
//! // Releasing twice is reported, not silently accepted.
//! assert!(arena.release(first).is_err());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `heapsim-arena` | `BlockArena`, handles, errors, traversal, `SharedArena` |
//! | [`sim`] | `heapsim-sim` | Seeded workload driver, metrics, memory-map rendering |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The allocator core (`heapsim-arena`).
pub use heapsim_arena as arena;

/// Workload driver and diagnostics (`heapsim-sim`).
pub use heapsim_sim as sim;

/// Common imports for typical heapsim usage.
///
/// ```rust
/// use heapsim::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use heapsim_arena::{
        ArenaConfig, ArenaError, ArenaStats, BlockArena, BlockHandle, BlockInfo, HandleFault,
        SharedArena,
    };

    // Simulation
    pub use heapsim_sim::report::MemoryMap;
    pub use heapsim_sim::{SimConfig, SimError, SimEvent, SimMetrics, Simulation};
}
