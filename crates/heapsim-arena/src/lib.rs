//! First-fit block arena for heap simulations.
//!
//! Models how a heap satisfies and releases requests inside a bounded
//! address range `[0, total_memory)`. The range is always exactly
//! partitioned into blocks, each free or used:
//!
//! ```text
//! BlockArena
//! ├── slots: Vec<Block>      (block table, prev/next as slot indices)
//! ├── vacant: Vec<usize>     (retired slots awaiting reuse)
//! └── head                   (block at address 0, never absorbed)
//! ```
//!
//! # Operations
//!
//! - **allocate:** first-fit scan from address 0, splitting off any
//!   remainder as a new free block.
//! - **release:** mark free, then coalesce with a free successor and a
//!   free predecessor.
//! - **blocks:** lazy, address-ordered traversal for diagnostics.
//!
//! # Handles
//!
//! [`BlockHandle`]s carry the issuing arena's [`ArenaId`], a slot index and
//! a generation stamp. Stamps are refreshed on every allocation, so a
//! handle to a block that was released, absorbed or reissued is detected
//! and rejected with [`ArenaError::InvalidHandle`].
//!
//! The arena never logs or prints; every failure is returned to the caller.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
mod block;
pub mod config;
pub mod error;
pub mod handle;
pub mod iter;
pub mod shared;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::BlockArena;
pub use block::BlockInfo;
pub use config::ArenaConfig;
pub use error::{ArenaError, HandleFault, InvariantViolation};
pub use handle::{ArenaId, BlockHandle};
pub use iter::Blocks;
pub use shared::SharedArena;
pub use stats::ArenaStats;
