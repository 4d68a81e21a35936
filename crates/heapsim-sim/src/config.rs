//! Simulation configuration and validation.
//!
//! [`SimConfig`] defaults reproduce the classic workload: a 1000-unit heap,
//! 50 allocation attempts of 5–50 units and 30 releases. Each field can be
//! overridden from the environment with [`SimConfig::from_env`].

use std::env::VarError;

use crate::error::SimError;

/// Environment variable overriding [`SimConfig::total_memory`].
pub const ENV_TOTAL_MEMORY: &str = "HEAPSIM_TOTAL_MEMORY";
/// Environment variable overriding [`SimConfig::seed`].
pub const ENV_SEED: &str = "HEAPSIM_SEED";
/// Environment variable overriding [`SimConfig::max_alloc_attempts`].
pub const ENV_ALLOC_ATTEMPTS: &str = "HEAPSIM_ALLOC_ATTEMPTS";
/// Environment variable overriding [`SimConfig::max_frees`].
pub const ENV_FREES: &str = "HEAPSIM_FREES";
/// Environment variable overriding [`SimConfig::min_request`].
pub const ENV_MIN_REQUEST: &str = "HEAPSIM_MIN_REQUEST";
/// Environment variable overriding [`SimConfig::max_request`].
pub const ENV_MAX_REQUEST: &str = "HEAPSIM_MAX_REQUEST";

/// Workload parameters for a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Capacity of the simulated heap. Default: 1000.
    pub total_memory: usize,
    /// Number of allocation attempts to make, successful or not. Default: 50.
    pub max_alloc_attempts: u32,
    /// Number of releases to perform. Default: 30.
    pub max_frees: u32,
    /// Smallest request size, inclusive. Default: 5.
    pub min_request: usize,
    /// Largest request size, inclusive. Default: 50.
    pub max_request: usize,
    /// Seed for the ChaCha8 workload RNG. Default: 0.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_memory: 1000,
            max_alloc_attempts: 50,
            max_frees: 30,
            min_request: 5,
            max_request: 50,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Defaults with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Defaults overridden by any `HEAPSIM_*` environment variables.
    pub fn from_env() -> Result<Self, SimError> {
        Self::from_lookup(|var| std::env::var(var))
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    ///
    /// `lookup` has the shape of [`std::env::var`]: `NotPresent` leaves the
    /// default in place, a non-UTF-8 value is reported as
    /// [`SimError::InvalidEnv`].
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, VarError>,
    ) -> Result<Self, SimError> {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, ENV_TOTAL_MEMORY)? {
            config.total_memory = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_SEED)? {
            config.seed = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_ALLOC_ATTEMPTS)? {
            config.max_alloc_attempts = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_FREES)? {
            config.max_frees = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_MIN_REQUEST)? {
            config.min_request = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_MAX_REQUEST)? {
            config.max_request = v;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants.
    ///
    /// Requests must be at least one unit and the range must not be
    /// inverted. A `max_request` larger than the heap is allowed; those
    /// requests simply fail.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.total_memory == 0 {
            return Err(SimError::InvalidConfig {
                reason: "total_memory must be at least 1".to_string(),
            });
        }
        if self.min_request == 0 {
            return Err(SimError::InvalidConfig {
                reason: "min_request must be at least 1".to_string(),
            });
        }
        if self.min_request > self.max_request {
            return Err(SimError::InvalidConfig {
                reason: format!(
                    "min_request ({}) exceeds max_request ({})",
                    self.min_request, self.max_request
                ),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Result<String, VarError>,
    var: &'static str,
) -> Result<Option<T>, SimError> {
    let raw = match lookup(var) {
        Ok(raw) => raw,
        Err(VarError::NotPresent) => return Ok(None),
        Err(VarError::NotUnicode(raw)) => {
            return Err(SimError::InvalidEnv {
                var,
                value: raw.to_string_lossy().into_owned(),
            })
        }
    };
    let parsed = raw.trim().parse::<T>();
    parsed
        .map(Some)
        .map_err(|_| SimError::InvalidEnv { var, value: raw })
}
