//! Genome factories
//!
//! Spawning pools create random genomes; a [`Spawner`] couples a pool with
//! the fitness evaluator every spawned individual receives.

use std::sync::Arc;

use rand::RngCore;

use crate::error::{EvoResult, OperatorError};
use crate::fitness::Fitness;
use crate::genome::{Alleles, Genome, ListGenome};
use crate::population::individual::Individual;

/// Factory for random genomes of one representation.
pub trait SpawningPool<G: Genome>: Send + Sync {
    /// Create one random genome
    fn create(&self, rng: &mut dyn RngCore) -> G;
}

/// Spawning pool for fixed-length list genomes.
pub struct ListSpawningPool<A> {
    alleles: Arc<dyn Alleles<A>>,
    genome_len: usize,
}

impl<A> ListSpawningPool<A> {
    /// Create a pool producing genomes of `genome_len` genes drawn from
    /// `alleles`. Errors if `genome_len` is zero.
    pub fn new(genome_len: usize, alleles: Arc<dyn Alleles<A>>) -> EvoResult<Self> {
        if genome_len == 0 {
            return Err(OperatorError::InvalidConfiguration(
                "list genomes must have at least one gene".to_string(),
            )
            .into());
        }
        Ok(Self {
            alleles,
            genome_len,
        })
    }

    /// Length of the genomes this pool produces
    pub fn genome_len(&self) -> usize {
        self.genome_len
    }
}

impl ListSpawningPool<bool> {
    /// Convenience constructor for binary genomes
    pub fn binary(genome_len: usize) -> EvoResult<Self> {
        use crate::genome::FiniteSetAlleles;
        Self::new(genome_len, Arc::new(FiniteSetAlleles::binary()))
    }
}

impl<A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static> SpawningPool<ListGenome<A>>
    for ListSpawningPool<A>
{
    fn create(&self, rng: &mut dyn RngCore) -> ListGenome<A> {
        let genes = (0..self.genome_len)
            .map(|_| self.alleles.draw(rng))
            .collect();
        ListGenome::new(genes)
    }
}

/// A spawning pool bound to a fitness evaluator.
///
/// Every individual a population holds goes through its spawner, so all of
/// them share the same evaluator and caching policy regardless of whether
/// they were spawned, seeded or inserted later.
pub struct Spawner<G: Genome> {
    pool: Arc<dyn SpawningPool<G>>,
    evaluator: Arc<dyn Fitness<G>>,
    cache_disabled: bool,
}

impl<G: Genome> Spawner<G> {
    /// Couple a spawning pool with a fitness evaluator
    pub fn new(pool: Arc<dyn SpawningPool<G>>, evaluator: Arc<dyn Fitness<G>>) -> Self {
        Self {
            pool,
            evaluator,
            cache_disabled: false,
        }
    }

    /// Disable fitness caching on all individuals this spawner touches
    pub fn with_cache_disabled(mut self, disabled: bool) -> Self {
        self.cache_disabled = disabled;
        self
    }

    /// The evaluator attached to spawned individuals
    pub fn evaluator(&self) -> &Arc<dyn Fitness<G>> {
        &self.evaluator
    }

    /// Spawn one individual with the evaluator attached
    pub fn spawn(&self, rng: &mut dyn RngCore) -> Individual<G> {
        let mut individual = Individual::with_evaluator(self.pool.create(rng), self.evaluator.clone());
        individual.set_cache_disabled(self.cache_disabled);
        individual
    }

    /// Attach this spawner's evaluator and caching policy to an existing
    /// individual, e.g. one seeded or inserted from outside
    pub fn adopt(&self, individual: &mut Individual<G>) {
        individual.set_evaluator(self.evaluator.clone());
        individual.set_cache_disabled(self.cache_disabled);
    }
}

impl<G: Genome> Clone for Spawner<G> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            evaluator: self.evaluator.clone(),
            cache_disabled: self.cache_disabled,
        }
    }
}
