//! Error types for the sort engine.
//!
//! Configuration problems are reported before any work starts, lookup
//! failures are returned synchronously from `SortEngine::start`, and faults
//! raised inside a sort are captured on the worker thread and surfaced
//! through the engine snapshot and `SortEngine::join`.

use std::fmt;

use thiserror::Error;

/// Invalid engine parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// A panic raised by a sort implementation while it was running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmFault {
    /// Registry id of the algorithm that faulted
    pub algorithm: String,
    /// 1-based repeat in which the fault happened
    pub repeat: usize,
    /// Panic payload, when it was a string
    pub message: String,
}

impl fmt::Display for AlgorithmFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "algorithm '{}' faulted on run {}: {}",
            self.algorithm, self.repeat, self.message
        )
    }
}

impl std::error::Error for AlgorithmFault {}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown algorithm '{name}' (available: {})", available.join(", "))]
    UnknownAlgorithm { name: String, available: Vec<String> },

    #[error("a sort is already in progress")]
    Busy,

    #[error("failed to spawn sort worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    AlgorithmFault(#[from] AlgorithmFault),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_algorithm_lists_available() {
        let err = EngineError::UnknownAlgorithm {
            name: "bogo".to_string(),
            available: vec!["bubble".to_string(), "quick_sort".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown algorithm 'bogo' (available: bubble, quick_sort)"
        );
    }

    #[test]
    fn test_fault_display() {
        let fault = AlgorithmFault {
            algorithm: "bubble".to_string(),
            repeat: 2,
            message: "index out of bounds".to_string(),
        };
        let err: EngineError = fault.into();
        assert_eq!(
            err.to_string(),
            "algorithm 'bubble' faulted on run 2: index out of bounds"
        );
    }
}
