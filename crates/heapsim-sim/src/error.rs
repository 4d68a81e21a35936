//! Simulation error types.

use std::error::Error;
use std::fmt;

use heapsim_arena::ArenaError;

/// Errors raised while configuring or running a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// A [`SimConfig`](crate::SimConfig) invariant was violated.
    InvalidConfig {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// An environment override could not be parsed.
    InvalidEnv {
        /// Name of the environment variable.
        var: &'static str,
        /// The unparseable value.
        value: String,
    },
    /// The arena rejected an operation the driver expected to succeed.
    Arena(ArenaError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid simulation config: {reason}"),
            Self::InvalidEnv { var, value } => {
                write!(f, "{var}={value:?} is not a non-negative integer")
            }
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for SimError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
