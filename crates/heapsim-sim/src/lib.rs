//! Workload driver and diagnostics for heapsim arenas.
//!
//! The allocator core in `heapsim-arena` only reacts to calls. This crate
//! supplies the caller side:
//!
//! - [`Simulation`]: a seeded random stimulus generator that allocates and
//!   releases blocks and records [`SimEvent`]s and [`SimMetrics`].
//! - [`report::MemoryMap`]: text rendering of the block sequence.
//! - [`init_tracing`]: subscriber setup for the `heapsim` binary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod logging;
pub mod metrics;
pub mod report;

pub use config::SimConfig;
pub use driver::{SimSummary, Simulation};
pub use error::SimError;
pub use event::SimEvent;
pub use logging::init_tracing;
pub use metrics::SimMetrics;
