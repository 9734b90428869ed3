//! The evolutionary step pipeline
//!
//! An [`Evolver`] bundles the four per-generation operators and runs one
//! generation at a time: select parents, maybe recombine them, mutate the
//! progeny and merge them back through the replacement strategy.

use log::trace;
use rand::Rng;

use crate::error::{EvoResult, EvolutionError};
use crate::genome::Genome;
use crate::operators::traits::{Mutation, Recombination, Replacement, Selection};
use crate::population::{Individual, Population};

/// Runs one generation of evolution over a population.
///
/// The offspring quota per generation is `ceil(size * replacement_rate)`,
/// so a positive rate always produces at least one offspring.
#[derive(Clone)]
pub struct Evolver<S, X, M, P> {
    selection: S,
    recombination: X,
    mutation: M,
    replacement: P,
    replacement_rate: f64,
    p_recombination: f64,
    p_mutation: f64,
}

impl<S, X, M, P> Evolver<S, X, M, P> {
    /// Create an evolver from its operators and rates.
    ///
    /// `replacement_rate` must lie in `(0, 1]`; the two probabilities in
    /// `[0, 1]`.
    pub fn new(
        selection: S,
        recombination: X,
        mutation: M,
        replacement: P,
        replacement_rate: f64,
        p_recombination: f64,
        p_mutation: f64,
    ) -> EvoResult<Self> {
        if !(replacement_rate > 0.0 && replacement_rate <= 1.0) {
            return Err(EvolutionError::InvalidReplacementRate(replacement_rate));
        }
        if !(0.0..=1.0).contains(&p_recombination) {
            return Err(EvolutionError::InvalidProbability {
                name: "recombination probability",
                value: p_recombination,
            });
        }
        if !(0.0..=1.0).contains(&p_mutation) {
            return Err(EvolutionError::InvalidProbability {
                name: "mutation probability",
                value: p_mutation,
            });
        }
        Ok(Self {
            selection,
            recombination,
            mutation,
            replacement,
            replacement_rate,
            p_recombination,
            p_mutation,
        })
    }

    /// Offspring produced per generation for a population of `size`
    pub fn offspring_quota(&self, size: usize) -> usize {
        (size as f64 * self.replacement_rate).ceil() as usize
    }

    /// The configured replacement rate
    pub fn replacement_rate(&self) -> f64 {
        self.replacement_rate
    }
}

impl<S, X, M, P> Evolver<S, X, M, P> {
    /// Run one generation and return a snapshot of the resulting best
    /// individual.
    pub fn step<G, R>(
        &self,
        population: &mut Population<G>,
        rng: &mut R,
    ) -> EvoResult<Individual<G>>
    where
        G: Genome,
        R: Rng,
        S: Selection<G>,
        X: Recombination<G>,
        M: Mutation<G>,
        P: Replacement<G>,
    {
        population.evaluate()?;

        let quota = self.offspring_quota(population.size());
        let arity = self.recombination.arity();
        let mut offspring: Vec<Individual<G>> = Vec::with_capacity(quota);

        while offspring.len() < quota {
            let parents = self.selection.select(population, arity, rng)?;

            let mut progeny = if rng.gen::<f64>() < self.p_recombination {
                self.recombination.apply(&parents, rng)?
            } else {
                parents
            };

            // a batch may overshoot the quota; keep a uniform random subset
            let remaining = quota - offspring.len();
            if progeny.len() > remaining {
                let keep = rand::seq::index::sample(rng, progeny.len(), remaining);
                let mut slots: Vec<Option<Individual<G>>> =
                    progeny.into_iter().map(Some).collect();
                progeny = keep.into_iter().filter_map(|i| slots[i].take()).collect();
            }

            for child in progeny {
                offspring.push(self.mutation.apply(&child, self.p_mutation, rng)?);
            }
        }
        trace!("produced {} offspring", offspring.len());

        self.replacement.replace(population, offspring)?;
        Ok(population.best()?.snapshot())
    }

    /// Run one generation with the work spread over worker chunks.
    ///
    /// The population is shuffled and partitioned; each chunk evolves
    /// independently with its own seeded generator, then the chunks are
    /// merged back. Chunk replacement preserves chunk sizes, so the merged
    /// population is exactly as large as the input. Falls back to
    /// [`step`](Evolver::step) when the population is too small to split.
    #[cfg(feature = "parallel")]
    pub fn step_parallel<G, R>(
        &self,
        population: &mut Population<G>,
        rng: &mut R,
    ) -> EvoResult<Individual<G>>
    where
        G: Genome,
        R: Rng,
        S: Selection<G> + Sync,
        X: Recombination<G> + Sync,
        M: Mutation<G> + Sync,
        P: Replacement<G> + Sync,
    {
        use log::debug;
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        use rayon::prelude::*;

        let arity = self.recombination.arity().max(1);
        let len = population.len();
        let workers = rayon::current_num_threads()
            .min(len / (2 * arity))
            .max(1);
        if workers <= 1 {
            return self.step(population, rng);
        }
        debug!("evolving {len} individuals across {workers} chunks");

        population.evaluate()?;
        population.shuffle(rng);

        let spawner = population.spawner().clone();
        let mut individuals = population.take_individuals();

        let base = len / workers;
        let extra = len % workers;
        let mut chunks: Vec<Population<G>> = Vec::with_capacity(workers);
        for w in 0..workers {
            let take = base + usize::from(w < extra);
            let rest = individuals.split_off(individuals.len() - take);
            chunks.push(Population::from_parts(rest, take, spawner.clone()));
        }

        // seeds are drawn sequentially so runs are reproducible per master seed
        let seeds: Vec<u64> = (0..workers).map(|_| rng.gen()).collect();

        let evolved: Vec<(Population<G>, Individual<G>)> = chunks
            .into_par_iter()
            .zip(seeds)
            .map(|(mut chunk, seed)| {
                let mut chunk_rng = StdRng::seed_from_u64(seed);
                let best = self.step(&mut chunk, &mut chunk_rng)?;
                Ok((chunk, best))
            })
            .collect::<EvoResult<Vec<_>>>()?;

        let mut merged = Vec::with_capacity(len);
        let mut best: Option<Individual<G>> = None;
        for (chunk, chunk_best) in evolved {
            merged.extend(chunk.into_individuals());
            let better = match &best {
                Some(current) => {
                    chunk_best.cached_fitness().unwrap_or(f64::NEG_INFINITY)
                        > current.cached_fitness().unwrap_or(f64::NEG_INFINITY)
                }
                None => true,
            };
            if better {
                best = Some(chunk_best);
            }
        }
        population.set_individuals(merged);

        best.ok_or(EvolutionError::EmptyPopulation)
    }
}
