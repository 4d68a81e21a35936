//! Test utilities for heapsim development.
//!
//! Provides layout fixtures ([`arena_from_layout`], [`assert_layout`]) for
//! building arenas in a known state, and operation scripts ([`Op`],
//! [`op_script`], [`apply_ops`]) for property-based churn tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod ops;

pub use fixtures::{arena_from_layout, assert_layout, layout_of, LayoutArena};
pub use ops::{apply_ops, op_script, Op};
