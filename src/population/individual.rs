//! Individual wrapper type
//!
//! This module provides the Individual type that couples a genome with its
//! fitness evaluator and a per-individual fitness cache.

use std::fmt;
use std::sync::Arc;

use crate::error::{EvoResult, EvolutionError};
use crate::fitness::Fitness;
use crate::genome::Genome;

/// An individual in the population.
///
/// Wraps a genome with the fitness evaluator it was spawned with and a
/// memoized fitness value. The cache is filled on the first call to
/// [`fitness`](Individual::fitness) and invalidated whenever the genome is
/// mutably borrowed, so a stale score can never outlive a genetic change.
pub struct Individual<G: Genome> {
    genome: G,
    evaluator: Option<Arc<dyn Fitness<G>>>,
    cached_fitness: Option<f64>,
    cache_disabled: bool,
}

impl<G: Genome> Individual<G> {
    /// Create a new individual with no evaluator attached
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            evaluator: None,
            cached_fitness: None,
            cache_disabled: false,
        }
    }

    /// Create a new individual with an evaluator attached
    pub fn with_evaluator(genome: G, evaluator: Arc<dyn Fitness<G>>) -> Self {
        Self {
            genome,
            evaluator: Some(evaluator),
            cached_fitness: None,
            cache_disabled: false,
        }
    }

    /// Attach (or replace) the fitness evaluator.
    ///
    /// Any cached value belongs to the previous evaluator, so it is dropped.
    pub fn set_evaluator(&mut self, evaluator: Arc<dyn Fitness<G>>) {
        self.evaluator = Some(evaluator);
        self.cached_fitness = None;
    }

    /// The attached evaluator, if any
    pub fn evaluator(&self) -> Option<&Arc<dyn Fitness<G>>> {
        self.evaluator.as_ref()
    }

    /// Disable or enable fitness caching.
    ///
    /// With caching disabled every call to [`fitness`](Individual::fitness)
    /// re-evaluates the genome. Useful for co-evolutionary settings where a
    /// genome's score depends on external state.
    pub fn set_cache_disabled(&mut self, disabled: bool) {
        self.cache_disabled = disabled;
        if disabled {
            self.cached_fitness = None;
        }
    }

    /// Whether fitness caching is disabled
    pub fn cache_disabled(&self) -> bool {
        self.cache_disabled
    }

    /// Get a reference to the genome
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Get a mutable reference to the genome.
    ///
    /// Invalidates the fitness cache, since the caller may change the genes.
    pub fn genome_mut(&mut self) -> &mut G {
        self.cached_fitness = None;
        &mut self.genome
    }

    /// Take the genome out of this individual
    pub fn into_genome(self) -> G {
        self.genome
    }

    /// Decode the genome into the domain's solution representation
    pub fn phenotype(&self) -> G::Phenotype {
        self.genome.decode()
    }

    /// Compute (or recall) this individual's fitness.
    ///
    /// Errors with [`EvolutionError::MissingEvaluator`] if no evaluator has
    /// been attached.
    pub fn fitness(&mut self) -> EvoResult<f64> {
        if let Some(value) = self.cached_fitness {
            return Ok(value);
        }
        let evaluator = self
            .evaluator
            .as_ref()
            .ok_or(EvolutionError::MissingEvaluator)?;
        let value = evaluator.evaluate(&self.genome);
        if !self.cache_disabled {
            self.cached_fitness = Some(value);
        }
        Ok(value)
    }

    /// Compute this individual's fitness in initialization mode.
    ///
    /// Delegates to [`Fitness::evaluate_init`] and never touches the cache,
    /// so a lenient initialization score cannot masquerade as a real one.
    pub fn fitness_init(&self) -> EvoResult<f64> {
        let evaluator = self
            .evaluator
            .as_ref()
            .ok_or(EvolutionError::MissingEvaluator)?;
        Ok(evaluator.evaluate_init(&self.genome))
    }

    /// The memoized fitness value, if one is present
    pub fn cached_fitness(&self) -> Option<f64> {
        self.cached_fitness
    }

    /// Whether this individual has a memoized fitness value
    pub fn is_evaluated(&self) -> bool {
        self.cached_fitness.is_some()
    }

    /// Drop the memoized fitness value
    pub fn invalidate_cache(&mut self) {
        self.cached_fitness = None;
    }

    /// Copy this individual including its fitness cache.
    ///
    /// `Clone` deliberately drops the cache; the driver uses this to record
    /// best-of-generation snapshots without re-evaluating.
    pub(crate) fn snapshot(&self) -> Self {
        Self {
            genome: self.genome.clone(),
            evaluator: self.evaluator.clone(),
            cached_fitness: self.cached_fitness,
            cache_disabled: self.cache_disabled,
        }
    }
}

/// Cloning copies the genome and keeps the evaluator, but resets the
/// fitness cache: the copy is expected to diverge from the original.
impl<G: Genome> Clone for Individual<G> {
    fn clone(&self) -> Self {
        Self {
            genome: self.genome.clone(),
            evaluator: self.evaluator.clone(),
            cached_fitness: None,
            cache_disabled: self.cache_disabled,
        }
    }
}

/// Equality compares genetic content only, never fitness
impl<G: Genome> PartialEq for Individual<G> {
    fn eq(&self, other: &Self) -> bool {
        self.genome == other.genome
    }
}

impl<G: Genome> fmt::Debug for Individual<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Individual")
            .field("genome", &self.genome)
            .field("cached_fitness", &self.cached_fitness)
            .field("cache_disabled", &self.cache_disabled)
            .finish()
    }
}
