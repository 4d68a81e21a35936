//! Seeded random workload driver.
//!
//! [`Simulation`] plays the role of a program using the heap: on each step
//! it flips a coin between allocating a random-sized block and releasing a
//! random outstanding one, until its attempt and release budgets run out.
//! It talks to the arena only through `allocate`, `release` and `resolve`,
//! and keeps its own list of outstanding handles.
//!
//! Determinism: the RNG is a ChaCha8 stream seeded from
//! [`SimConfig::seed`], so identical configs produce identical event traces.

use heapsim_arena::{ArenaError, ArenaStats, BlockArena, BlockHandle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, info_span, warn};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::event::SimEvent;
use crate::metrics::SimMetrics;

/// Final figures for a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimSummary {
    /// Accumulated counters and high-water marks.
    pub metrics: SimMetrics,
    /// Arena occupancy after the last step.
    pub final_stats: ArenaStats,
    /// Handles still held by the driver at the end.
    pub outstanding: usize,
}

/// A random allocate/release workload over one [`BlockArena`].
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    arena: BlockArena,
    rng: ChaCha8Rng,
    /// Handles of blocks this driver allocated and has not yet released,
    /// in allocation order.
    outstanding: Vec<BlockHandle>,
    alloc_attempts: u32,
    frees: u32,
    metrics: SimMetrics,
}

impl Simulation {
    /// Validate `config` and create a fresh arena for it.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let arena = BlockArena::new(config.total_memory)?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            arena,
            outstanding: Vec::new(),
            alloc_attempts: 0,
            frees: 0,
            metrics: SimMetrics::default(),
        })
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only view of the simulated heap.
    pub fn arena(&self) -> &BlockArena {
        &self.arena
    }

    /// Handles currently held by the driver.
    pub fn outstanding(&self) -> &[BlockHandle] {
        &self.outstanding
    }

    /// Allocation attempts made so far.
    pub fn alloc_attempts(&self) -> u32 {
        self.alloc_attempts
    }

    /// Releases performed so far.
    pub fn frees(&self) -> u32 {
        self.frees
    }

    /// Metrics accumulated so far.
    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    /// Whether no further step can produce an event.
    ///
    /// The run ends once the attempt budget is spent and either the release
    /// budget is spent too or there is nothing left to release.
    pub fn is_finished(&self) -> bool {
        let allocs_done = self.alloc_attempts >= self.config.max_alloc_attempts;
        let frees_done = self.frees >= self.config.max_frees;
        allocs_done && (frees_done || self.outstanding.is_empty())
    }

    /// Advance by one coin flip.
    ///
    /// Returns `Ok(None)` when the chosen action is not currently possible
    /// (its budget is spent, or there is nothing to release).
    pub fn step(&mut self) -> Result<Option<SimEvent>, SimError> {
        let event = if self.rng.random_bool(0.5) {
            if self.alloc_attempts < self.config.max_alloc_attempts {
                Some(self.allocate_random()?)
            } else {
                None
            }
        } else if self.frees < self.config.max_frees && !self.outstanding.is_empty() {
            Some(self.release_random()?)
        } else {
            None
        };

        if let Some(event) = &event {
            self.metrics.record(event, &self.arena.stats());
        }
        Ok(event)
    }

    /// Step until [`is_finished`](Self::is_finished), passing every event
    /// and the arena state it left behind to `observer`.
    pub fn run(
        &mut self,
        mut observer: impl FnMut(&SimEvent, &BlockArena),
    ) -> Result<SimSummary, SimError> {
        let span = info_span!(
            "simulation",
            seed = self.config.seed,
            total_memory = self.config.total_memory
        );
        let _enter = span.enter();

        while !self.is_finished() {
            if let Some(event) = self.step()? {
                observer(&event, &self.arena);
            }
        }

        let summary = self.summary();
        info!(
            allocations = summary.metrics.allocations,
            failures = summary.metrics.allocation_failures,
            releases = summary.metrics.releases,
            outstanding = summary.outstanding,
            fragmentation = summary.final_stats.fragmentation(),
            "simulation finished"
        );
        Ok(summary)
    }

    /// Consume the driver, handing back the arena and the handles it still
    /// holds, in allocation order.
    pub fn into_parts(self) -> (BlockArena, Vec<BlockHandle>) {
        (self.arena, self.outstanding)
    }

    /// Snapshot of the current metrics and arena occupancy.
    pub fn summary(&self) -> SimSummary {
        SimSummary {
            metrics: self.metrics.clone(),
            final_stats: self.arena.stats(),
            outstanding: self.outstanding.len(),
        }
    }

    fn allocate_random(&mut self) -> Result<SimEvent, SimError> {
        self.alloc_attempts += 1;
        let attempt = self.alloc_attempts;
        let size = self
            .rng
            .random_range(self.config.min_request..=self.config.max_request);

        match self.arena.allocate(size) {
            Ok(handle) => {
                let start = self.arena.resolve(handle)?.start;
                self.outstanding.push(handle);
                debug!(attempt, size, start, "allocated block");
                Ok(SimEvent::Allocated {
                    attempt,
                    size,
                    start,
                    handle,
                })
            }
            Err(ArenaError::AllocationFailed { largest_free, .. }) => {
                warn!(attempt, size, largest_free, "no suitable block");
                Ok(SimEvent::AllocationFailed {
                    attempt,
                    size,
                    largest_free,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn release_random(&mut self) -> Result<SimEvent, SimError> {
        self.frees += 1;
        let release = self.frees;
        let pick = self.rng.random_range(0..self.outstanding.len());
        let handle = self.outstanding.remove(pick);

        let block = self.arena.resolve(handle)?;
        self.arena.release(handle)?;
        debug!(release, start = block.start, size = block.size, "released block");
        Ok(SimEvent::Released {
            release,
            start: block.start,
            size: block.size,
        })
    }
}
