//! Operator traits
//!
//! This module defines the core operator traits for genetic algorithms.
//! Each trait pairs a required `perform`-style method with a provided
//! wrapper that enforces the operator's contract (size checks, arity
//! checks, application probability) so implementations stay small.

use rand::Rng;

use crate::error::{EvoResult, OperatorError};
use crate::genome::Genome;
use crate::population::{Individual, Population};

/// Selection operator trait
///
/// Picks individuals from a population for reproduction. Implementations
/// read fitness, so callers are expected to work with evaluated
/// populations; selection itself evaluates lazily where it needs to.
pub trait Selection<G: Genome>: Send + Sync {
    /// Pick `n` individuals, returning copies of them.
    ///
    /// Called through [`select`](Selection::select), which has already
    /// checked the population is large enough.
    fn perform<R: Rng>(
        &self,
        population: &mut Population<G>,
        n: usize,
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>>;

    /// Whether this operator may pick the same individual more than once
    fn allows_repetition(&self) -> bool {
        false
    }

    /// Select `n` individuals from the population.
    ///
    /// Errors with [`OperatorError::SelectionSize`] when repetition is not
    /// allowed and the population holds fewer than `n` individuals.
    fn select<R: Rng>(
        &self,
        population: &mut Population<G>,
        n: usize,
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>> {
        if !self.allows_repetition() && n > population.len() {
            return Err(OperatorError::SelectionSize {
                requested: n,
                available: population.len(),
            }
            .into());
        }
        self.perform(population, n, rng)
    }
}

/// Recombination operator trait
///
/// Combines genetic material from a fixed number of parents into progeny.
/// The number of parents is declared up front via [`arity`](Recombination::arity)
/// so callers can select the right number before invoking the operator.
pub trait Recombination<G: Genome>: Send + Sync {
    /// Number of parents this operator combines
    fn arity(&self) -> usize {
        2
    }

    /// Combine `parents` into progeny.
    ///
    /// Called through [`apply`](Recombination::apply), which has already
    /// checked the arity.
    fn recombine<R: Rng>(
        &self,
        parents: &[Individual<G>],
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>>;

    /// Recombine `parents`, checking they match the declared arity.
    fn apply<R: Rng>(
        &self,
        parents: &[Individual<G>],
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>> {
        if parents.len() != self.arity() {
            return Err(OperatorError::ArityMismatch {
                expected: self.arity(),
                actual: parents.len(),
            }
            .into());
        }
        self.recombine(parents, rng)
    }
}

/// Mutation operator trait
///
/// Randomly alters one individual. The input is never modified: the
/// wrapper clones it first and mutates the copy in place.
pub trait Mutation<G: Genome>: Send + Sync {
    /// Mutate the individual in place
    fn perform<R: Rng>(&self, individual: &mut Individual<G>, rng: &mut R) -> EvoResult<()>;

    /// With probability `p`, return a mutated copy of `individual`;
    /// otherwise return an untouched copy.
    fn apply<R: Rng>(
        &self,
        individual: &Individual<G>,
        p: f64,
        rng: &mut R,
    ) -> EvoResult<Individual<G>> {
        let mut copy = individual.clone();
        if rng.gen::<f64>() < p {
            self.perform(&mut copy, rng)?;
        }
        Ok(copy)
    }
}

/// Replacement operator trait
///
/// Merges offspring back into a population while keeping its size.
pub trait Replacement<G: Genome>: Send + Sync {
    /// Replace part of `population` with `offspring`
    fn replace(
        &self,
        population: &mut Population<G>,
        offspring: Vec<Individual<G>>,
    ) -> EvoResult<()>;
}

/// Catastrophe operator trait
///
/// A drastic, usually rare population-wide event meant to reintroduce
/// diversity when evolution stagnates.
pub trait Catastrophe<G: Genome>: Send + Sync {
    /// Possibly apply the catastrophe to the population
    fn apply<R: Rng>(&self, population: &mut Population<G>, rng: &mut R) -> EvoResult<()>;
}

/// Diversity measure trait
pub trait Diversity<G: Genome>: Send + Sync {
    /// Measure the genetic diversity of the population
    fn measure(&self, population: &Population<G>) -> EvoResult<f64>;
}
