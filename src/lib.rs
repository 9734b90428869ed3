//! # genetica
//!
//! A composable genetic algorithm library for Rust.
//!
//! Evolution is expressed as a pipeline of swappable operators: selection
//! picks parents, recombination and mutation derive offspring, replacement
//! merges them back into the population. A generational driver wires the
//! pipeline to one or more populations and runs it until a stop condition
//! holds.
//!
//! ## Core Concepts
//!
//! - **Genomes and spawning pools**: trait-based genome abstraction with a
//!   ready-made list genome over arbitrary allele sets
//! - **Lazy fitness**: individuals memoize their fitness and populations
//!   sort only when an operator needs the ordering
//! - **Composable operators**: every pipeline stage is a trait, so custom
//!   operators plug in next to the built-in ones
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use genetica::prelude::*;
//! use std::sync::Arc;
//!
//! let pool = Arc::new(ListSpawningPool::binary(20)?);
//! let spawner = Spawner::new(pool, Arc::new(OneMax));
//!
//! let best = GeneticAlgorithmBuilder::new()
//!     .population(PopulationSpec::new(100, spawner))
//!     .selection(TournamentSelection::new(3)?.with_repetition(true))
//!     .recombination(OnePointRecombination)
//!     .mutation(SingleGeneRandomValue::new(Arc::new(FiniteSetAlleles::binary())))
//!     .replacement(HighElitism)
//!     .steps(200)
//!     .build()?
//!     .run()?;
//! ```

pub mod algorithms;
pub mod error;
pub mod evolver;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;
pub mod stop;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::{
        GeneticAlgorithm, GeneticAlgorithmBuilder, Listener, LoggingListener, PopulationSpec,
    };
    pub use crate::error::{EvoResult, EvolutionError, OperatorError};
    pub use crate::evolver::Evolver;
    pub use crate::fitness::{Fitness, FnFitness, MinimizeFitness, OneMax, Sphere};
    pub use crate::genome::{Alleles, FiniteSetAlleles, Genome, IntervalAlleles, ListGenome};
    pub use crate::operators::{
        AverageDistance, BestSelection, Catastrophe, DifferentGenes, Diversity,
        DoomsdayByProbability, HighElitism, LowElitism, Mutation, NGeneRandomValue,
        NoCatastrophe, OnePointRecombination, PackingByProbability, RankSelection, Recombination,
        Replacement, Selection, SingleGeneRandomValue, SwapGenes, TournamentSelection,
        TwoPointRecombination, UniformRecombination, UniformSelection,
    };
    pub use crate::population::{Individual, ListSpawningPool, Population, Spawner, SpawningPool};
    pub use crate::stop::{
        AllOf, AnyOf, FitnessBound, FitnessStagnation, RunState, StepsNum, StopCondition,
    };
}
