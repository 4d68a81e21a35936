//! `heapsim`: run the random allocate/release workload and print the heap
//! after every event.
//!
//! Configure with `HEAPSIM_*` environment variables (see `SimConfig`) and
//! `RUST_LOG` for log verbosity.

use std::process::ExitCode;

use heapsim_sim::report::MemoryMap;
use heapsim_sim::{init_tracing, SimConfig, SimError, Simulation};
use tracing::{error, info};

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "simulation aborted");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SimError> {
    let config = SimConfig::from_env()?;
    info!(
        seed = config.seed,
        total_memory = config.total_memory,
        attempts = config.max_alloc_attempts,
        frees = config.max_frees,
        "starting heap simulation"
    );

    let mut sim = Simulation::new(config)?;
    let summary = sim.run(|event, arena| {
        println!("{event}");
        println!("{}", MemoryMap::of(arena));
    })?;

    println!("Final Memory State:");
    println!("{}", MemoryMap::of(sim.arena()));
    println!(
        "allocations={} failures={} releases={} peak_blocks={} fragmentation={:.3}",
        summary.metrics.allocations,
        summary.metrics.allocation_failures,
        summary.metrics.releases,
        summary.metrics.peak_block_count,
        summary.final_stats.fragmentation(),
    );
    Ok(())
}
