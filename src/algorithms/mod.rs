//! Algorithm drivers and run lifecycle hooks

pub mod genetic;
pub mod listener;

pub use genetic::{GeneticAlgorithm, GeneticAlgorithmBuilder, PopulationSpec};
pub use listener::{Listener, LoggingListener};
