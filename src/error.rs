//! Error types for genetica
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Selection asked for more individuals than the population holds
    /// and the operator does not allow repetition
    #[error("cannot select {requested} individuals from a population of {available} without repetition")]
    SelectionSize { requested: usize, available: usize },

    /// Recombination invoked with the wrong number of parents
    #[error("recombination has arity {expected} but received {actual} parents")]
    ArityMismatch { expected: usize, actual: usize },

    /// Parents do not satisfy a structural precondition (e.g. equal length)
    #[error("structure mismatch: {0}")]
    StructureMismatch(String),

    /// Invalid operator configuration
    #[error("invalid operator configuration: {0}")]
    InvalidConfiguration(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    /// Operator error
    #[error("operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Population size must be at least 1
    #[error("invalid population size {0}, must be >= 1")]
    InvalidSize(usize),

    /// A probability parameter fell outside [0, 1]
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// Replacement rate must be in (0, 1]
    #[error("replacement rate must be in (0, 1], got {0}")]
    InvalidReplacementRate(f64),

    /// Fitness requested before an evaluator was attached
    #[error("individual has no fitness evaluator attached")]
    MissingEvaluator,

    /// Invalid configuration (e.g. a builder component is missing)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Empty population
    #[error("empty population")]
    EmptyPopulation,

    /// Requested a best-individual snapshot for an unrecorded generation
    #[error("no snapshot recorded for generation {requested}; {recorded} generations recorded")]
    HistoryOutOfRange { requested: usize, recorded: usize },
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
