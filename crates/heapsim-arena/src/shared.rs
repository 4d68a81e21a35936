//! Thread-shareable wrapper around a [`BlockArena`].
//!
//! [`SharedArena`] puts the whole block sequence behind one `Mutex`. Every
//! call holds the lock for its full duration, so other threads never see a
//! split or merge half-applied and [`snapshot`](SharedArena::snapshot) is
//! always consistent.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::arena::BlockArena;
use crate::block::BlockInfo;
use crate::error::ArenaError;
use crate::handle::BlockHandle;
use crate::stats::ArenaStats;

/// Cloneable, lock-protected handle to a single arena.
#[derive(Clone, Debug)]
pub struct SharedArena {
    inner: Arc<Mutex<BlockArena>>,
}

impl SharedArena {
    /// Create a shared arena managing `total_memory` units.
    pub fn new(total_memory: usize) -> Result<Self, ArenaError> {
        Ok(Self::from_arena(BlockArena::new(total_memory)?))
    }

    /// Take ownership of an existing arena.
    pub fn from_arena(arena: BlockArena) -> Self {
        Self {
            inner: Arc::new(Mutex::new(arena)),
        }
    }

    /// See [`BlockArena::allocate`].
    pub fn allocate(&self, size: usize) -> Result<BlockHandle, ArenaError> {
        self.lock().allocate(size)
    }

    /// See [`BlockArena::release`].
    pub fn release(&self, handle: BlockHandle) -> Result<(), ArenaError> {
        self.lock().release(handle)
    }

    /// See [`BlockArena::resolve`].
    pub fn resolve(&self, handle: BlockHandle) -> Result<BlockInfo, ArenaError> {
        self.lock().resolve(handle)
    }

    /// Copy out the full block sequence under the lock.
    pub fn snapshot(&self) -> Vec<BlockInfo> {
        self.lock().blocks().collect()
    }

    /// See [`BlockArena::stats`].
    pub fn stats(&self) -> ArenaStats {
        self.lock().stats()
    }

    /// Run `f` with exclusive access to the arena.
    pub fn with<R>(&self, f: impl FnOnce(&mut BlockArena) -> R) -> R {
        f(&mut self.lock())
    }

    // No arena operation panics between its first and last write, so a
    // poisoned lock still guards a consistent sequence.
    fn lock(&self) -> MutexGuard<'_, BlockArena> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
