//! Fitness evaluation
//!
//! This module defines the fitness evaluation trait and adapters.

pub mod benchmarks;

pub use benchmarks::{OneMax, Sphere};

use crate::genome::Genome;

/// Fitness evaluation trait.
///
/// Defines how to score a genome. Higher is better by convention; wrap a
/// function in [`MinimizeFitness`] for minimization problems.
///
/// Implementations are shared behind `Arc<dyn Fitness<G>>` so an evaluator
/// attached to a population follows every individual it produces.
pub trait Fitness<G: Genome>: Send + Sync {
    /// Evaluate fitness (higher = better by convention)
    fn evaluate(&self, genome: &G) -> f64;

    /// Evaluate an individual produced during population initialization.
    ///
    /// Freshly spawned genomes may be structurally poor or even infeasible;
    /// implementations can score them more leniently here. Values produced
    /// by this method are never cached.
    fn evaluate_init(&self, genome: &G) -> f64 {
        self.evaluate(genome)
    }
}

/// A wrapper to negate a fitness function (for minimization problems)
pub struct MinimizeFitness<F> {
    inner: F,
}

impl<F> MinimizeFitness<F> {
    /// Create a minimization wrapper around a fitness function
    pub fn new(fitness: F) -> Self {
        Self { inner: fitness }
    }
}

impl<G: Genome, F: Fitness<G>> Fitness<G> for MinimizeFitness<F> {
    fn evaluate(&self, genome: &G) -> f64 {
        -self.inner.evaluate(genome)
    }

    fn evaluate_init(&self, genome: &G) -> f64 {
        -self.inner.evaluate_init(genome)
    }
}

/// A simple function wrapper for fitness evaluation
pub struct FnFitness<G, F>
where
    F: Fn(&G) -> f64,
{
    f: F,
    _marker: std::marker::PhantomData<fn(&G)>,
}

impl<G, F> FnFitness<G, F>
where
    F: Fn(&G) -> f64,
{
    /// Create a new function-based fitness evaluator
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<G, F> Fitness<G> for FnFitness<G, F>
where
    G: Genome,
    F: Fn(&G) -> f64 + Send + Sync,
{
    fn evaluate(&self, genome: &G) -> f64 {
        (self.f)(genome)
    }
}
