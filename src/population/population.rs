//! Population container
//!
//! A population holds the individuals of one evolving lineage, keeps them
//! lazily sorted by fitness and tops itself up from its spawner.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{EvoResult, EvolutionError};
use crate::genome::Genome;
use crate::population::individual::Individual;
use crate::population::spawning_pool::Spawner;

/// An ordered collection of individuals.
///
/// The population tracks whether it is currently sorted by fitness
/// (descending, best first). Sorting is lazy: mutating operations clear the
/// flag and [`sort`](Population::sort) is a no-op while it is still set.
pub struct Population<G: Genome> {
    individuals: Vec<Individual<G>>,
    size: usize,
    spawner: Spawner<G>,
    sorted: bool,
}

impl<G: Genome> Population<G> {
    /// Create a population of `size` freshly spawned individuals.
    ///
    /// Errors with [`EvolutionError::InvalidSize`] if `size` is zero.
    pub fn new<R: Rng>(size: usize, spawner: Spawner<G>, rng: &mut R) -> EvoResult<Self> {
        Self::with_seeds(size, spawner, Vec::new(), rng)
    }

    /// Create a population of `size` individuals starting from `seeds`.
    ///
    /// Seeds are adopted by the spawner (evaluator attached). If there are
    /// fewer seeds than `size` the population is topped up with spawned
    /// individuals; if there are more, a uniform random subset survives.
    pub fn with_seeds<R: Rng>(
        size: usize,
        spawner: Spawner<G>,
        mut seeds: Vec<Individual<G>>,
        rng: &mut R,
    ) -> EvoResult<Self> {
        if size < 1 {
            return Err(EvolutionError::InvalidSize(size));
        }

        for seed in &mut seeds {
            spawner.adopt(seed);
        }
        if seeds.len() > size {
            seeds.partial_shuffle(rng, size);
            seeds.truncate(size);
        }
        while seeds.len() < size {
            seeds.push(spawner.spawn(rng));
        }

        Ok(Self {
            individuals: seeds,
            size,
            spawner,
            sorted: false,
        })
    }

    /// Target size of this population
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current number of individuals
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population currently holds no individuals
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Whether the fitness ordering is currently known to hold
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// The spawner this population draws new individuals from
    pub fn spawner(&self) -> &Spawner<G> {
        &self.spawner
    }

    /// The individuals in their current order
    pub fn individuals(&self) -> &[Individual<G>] {
        &self.individuals
    }

    /// Individual at the given fitness rank, best first.
    ///
    /// Sorts if needed, so `get(0)` is always the fittest individual.
    /// Positional access in the current order goes through
    /// [`individuals`](Population::individuals).
    pub fn get(&mut self, rank: usize) -> EvoResult<Option<&Individual<G>>> {
        self.sort()?;
        Ok(self.individuals.get(rank))
    }

    /// Mutable individual at the given fitness rank, best first.
    ///
    /// Sorts first, then clears the sorted flag: the caller may change
    /// genes or fitness.
    pub fn get_mut(&mut self, rank: usize) -> EvoResult<Option<&mut Individual<G>>> {
        self.sort()?;
        self.sorted = false;
        Ok(self.individuals.get_mut(rank))
    }

    /// Iterate over the individuals
    pub fn iter(&self) -> std::slice::Iter<'_, Individual<G>> {
        self.individuals.iter()
    }

    /// Append one individual, adopting it into this population
    pub fn push(&mut self, mut individual: Individual<G>) {
        self.spawner.adopt(&mut individual);
        self.individuals.push(individual);
        self.sorted = false;
    }

    /// Append several individuals, adopting each
    pub fn extend(&mut self, individuals: impl IntoIterator<Item = Individual<G>>) {
        for individual in individuals {
            self.push(individual);
        }
    }

    /// Insert an individual at the given position, adopting it
    pub fn insert(&mut self, index: usize, mut individual: Individual<G>) {
        self.spawner.adopt(&mut individual);
        self.individuals.insert(index, individual);
        self.sorted = false;
    }

    /// Remove and return the individual at the given position
    pub fn remove(&mut self, index: usize) -> Individual<G> {
        self.sorted = false;
        self.individuals.remove(index)
    }

    /// Replace the individual at the given position, returning the old one
    pub fn replace(&mut self, index: usize, mut individual: Individual<G>) -> Individual<G> {
        self.spawner.adopt(&mut individual);
        self.sorted = false;
        std::mem::replace(&mut self.individuals[index], individual)
    }

    /// Drop all individuals past `len`.
    ///
    /// Removing a suffix cannot break a descending order, so the sorted
    /// flag is left untouched.
    pub fn truncate(&mut self, len: usize) {
        self.individuals.truncate(len);
    }

    /// Randomly reorder the individuals
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.individuals.shuffle(rng);
        self.sorted = false;
    }

    /// Evaluate every individual, filling fitness caches.
    pub fn evaluate(&mut self) -> EvoResult<()> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.individuals
                .par_iter_mut()
                .try_for_each(|ind| ind.fitness().map(|_| ()))
        }
        #[cfg(not(feature = "parallel"))]
        {
            for ind in &mut self.individuals {
                ind.fitness()?;
            }
            Ok(())
        }
    }

    /// Evaluate every individual in initialization mode.
    ///
    /// Values are discarded, never cached; this exists so evaluators with a
    /// distinct startup behavior see each spawned genome once.
    pub fn evaluate_init(&self) -> EvoResult<()> {
        for ind in &self.individuals {
            ind.fitness_init()?;
        }
        Ok(())
    }

    /// Fitness of every individual, in current order.
    ///
    /// Uses each individual's cache where present, so this is cheap on an
    /// evaluated population.
    pub fn fitness_values(&mut self) -> EvoResult<Vec<f64>> {
        let mut values = Vec::with_capacity(self.individuals.len());
        for ind in &mut self.individuals {
            values.push(ind.fitness()?);
        }
        Ok(values)
    }

    /// Remove the `count` least fit individuals.
    ///
    /// Sorts first if needed. The worst occupy the tail of a descending
    /// order, so dropping them is a truncation and the sorted flag
    /// survives.
    pub fn drop_worst(&mut self, count: usize) -> EvoResult<()> {
        self.sort()?;
        let keep = self.individuals.len().saturating_sub(count);
        self.individuals.truncate(keep);
        Ok(())
    }

    /// Sort the population by fitness, descending (best first).
    ///
    /// Returns `Ok(true)` if a sort actually ran and `Ok(false)` if the
    /// population was already known to be sorted. The sort is stable, so
    /// equally fit individuals keep their relative order.
    pub fn sort(&mut self) -> EvoResult<bool> {
        if self.sorted {
            return Ok(false);
        }

        let mut keys = Vec::with_capacity(self.individuals.len());
        for ind in &mut self.individuals {
            keys.push(ind.fitness()?);
        }
        let mut paired: Vec<(f64, Individual<G>)> =
            keys.into_iter().zip(self.individuals.drain(..)).collect();
        paired.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.individuals.extend(paired.into_iter().map(|(_, ind)| ind));

        self.sorted = true;
        Ok(true)
    }

    /// The fittest individual.
    ///
    /// Sorts if needed. Errors on an empty population.
    pub fn best(&mut self) -> EvoResult<&Individual<G>> {
        if self.individuals.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        self.sort()?;
        Ok(&self.individuals[0])
    }

    /// The least fit individual.
    ///
    /// Sorts if needed. Errors on an empty population.
    pub fn worst(&mut self) -> EvoResult<&Individual<G>> {
        if self.individuals.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        self.sort()?;
        // non-empty was just checked
        Ok(&self.individuals[self.individuals.len() - 1])
    }

    /// Consume the population, yielding its individuals
    pub fn into_individuals(self) -> Vec<Individual<G>> {
        self.individuals
    }

    pub(crate) fn take_individuals(&mut self) -> Vec<Individual<G>> {
        self.sorted = false;
        std::mem::take(&mut self.individuals)
    }

    pub(crate) fn set_individuals(&mut self, individuals: Vec<Individual<G>>) {
        self.individuals = individuals;
        self.sorted = false;
    }

    pub(crate) fn from_parts(
        individuals: Vec<Individual<G>>,
        size: usize,
        spawner: Spawner<G>,
    ) -> Self {
        Self {
            individuals,
            size,
            spawner,
            sorted: false,
        }
    }
}

impl<G: Genome> Clone for Population<G> {
    fn clone(&self) -> Self {
        Self {
            individuals: self.individuals.clone(),
            size: self.size,
            spawner: self.spawner.clone(),
            // clones drop fitness caches, so the order is no longer backed
            // by comparable values
            sorted: false,
        }
    }
}

impl<G: Genome> std::fmt::Debug for Population<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("len", &self.individuals.len())
            .field("size", &self.size)
            .field("sorted", &self.sorted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::OneMax;
    use crate::genome::ListGenome;
    use crate::population::spawning_pool::{ListSpawningPool, SpawningPool};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn binary_spawner(genome_len: usize) -> Spawner<ListGenome<bool>> {
        let pool = Arc::new(ListSpawningPool::binary(genome_len).unwrap());
        Spawner::new(pool, Arc::new(OneMax))
    }

    fn seed(bits: Vec<bool>) -> Individual<ListGenome<bool>> {
        Individual::new(ListGenome::new(bits))
    }

    #[test]
    fn test_new_spawns_to_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let pop = Population::new(10, binary_spawner(6), &mut rng).unwrap();
        assert_eq!(pop.len(), 10);
        assert_eq!(pop.size(), 10);
        assert!(!pop.is_sorted());
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = Population::new(0, binary_spawner(6), &mut rng);
        assert_eq!(result.err(), Some(EvolutionError::InvalidSize(0)));
    }

    #[test]
    fn test_short_seed_list_is_topped_up() {
        let mut rng = StdRng::seed_from_u64(2);
        let seeds = vec![seed(vec![true; 4]), seed(vec![false; 4])];
        let pop = Population::with_seeds(5, binary_spawner(4), seeds, &mut rng).unwrap();
        assert_eq!(pop.len(), 5);
        // all individuals got the spawner's evaluator
        assert!(pop.iter().all(|ind| ind.evaluator().is_some()));
    }

    #[test]
    fn test_long_seed_list_is_subsampled() {
        let mut rng = StdRng::seed_from_u64(3);
        let seeds = (0..20).map(|i| seed(vec![i % 2 == 0; 4])).collect();
        let pop = Population::with_seeds(7, binary_spawner(4), seeds, &mut rng).unwrap();
        assert_eq!(pop.len(), 7);
    }

    #[test]
    fn test_sort_orders_descending_best_first() {
        let mut rng = StdRng::seed_from_u64(4);
        let seeds = vec![
            seed(vec![true, true, true, false]),
            seed(vec![false, false, false, false]),
            seed(vec![true, true, false, false]),
        ];
        let mut pop = Population::with_seeds(3, binary_spawner(4), seeds, &mut rng).unwrap();

        assert!(pop.sort().unwrap());
        let fitnesses: Vec<f64> = pop
            .individuals()
            .iter()
            .map(|ind| ind.cached_fitness().unwrap())
            .collect();
        assert_eq!(fitnesses, vec![3.0, 2.0, 0.0]);
        assert_eq!(pop.best().unwrap().cached_fitness(), Some(3.0));
        assert_eq!(pop.worst().unwrap().cached_fitness(), Some(0.0));
    }

    #[test]
    fn test_sort_is_lazy() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pop = Population::new(8, binary_spawner(6), &mut rng).unwrap();

        assert!(pop.sort().unwrap());
        // second call sees the flag and does nothing
        assert!(!pop.sort().unwrap());

        pop.push(seed(vec![true; 6]));
        assert!(!pop.is_sorted());
        assert!(pop.sort().unwrap());
    }

    #[test]
    fn test_mutating_operations_clear_sorted_flag() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut pop = Population::new(4, binary_spawner(4), &mut rng).unwrap();
        pop.sort().unwrap();

        pop.extend(vec![seed(vec![true; 4])]);
        assert!(!pop.is_sorted());
        pop.sort().unwrap();

        pop.insert(0, seed(vec![false; 4]));
        assert!(!pop.is_sorted());
        pop.sort().unwrap();

        pop.replace(0, seed(vec![true; 4]));
        assert!(!pop.is_sorted());
        pop.sort().unwrap();

        pop.remove(0);
        assert!(!pop.is_sorted());
    }

    #[test]
    fn test_truncate_preserves_sorted_flag() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pop = Population::new(6, binary_spawner(4), &mut rng).unwrap();
        pop.sort().unwrap();

        pop.truncate(3);
        assert!(pop.is_sorted());
        assert_eq!(pop.len(), 3);
        assert!(!pop.sort().unwrap());
    }

    #[test]
    fn test_sort_is_stable_for_equal_fitness() {
        let mut rng = StdRng::seed_from_u64(8);
        // two distinct genomes with the same fitness
        let a = seed(vec![true, false, false]);
        let b = seed(vec![false, true, false]);
        let seeds = vec![a.clone(), b.clone()];
        let mut pop = Population::with_seeds(2, binary_spawner(3), seeds, &mut rng).unwrap();

        pop.sort().unwrap();
        assert_eq!(pop.get(0).unwrap().map(|i| i.genome()), Some(a.genome()));
        assert_eq!(pop.get(1).unwrap().map(|i| i.genome()), Some(b.genome()));
    }

    #[test]
    fn test_get_reads_by_rank() {
        let mut rng = StdRng::seed_from_u64(14);
        let seeds = vec![seed(vec![false; 4]), seed(vec![true; 4])];
        let mut pop = Population::with_seeds(2, binary_spawner(4), seeds, &mut rng).unwrap();
        assert!(!pop.is_sorted());

        // rank 0 is the fittest regardless of insertion order
        let best = pop.get(0).unwrap().unwrap();
        assert_eq!(best.genome().genes(), vec![true; 4]);
        assert!(pop.is_sorted());

        // the rank read sorted; a second one must not sort again
        assert!(!pop.sort().unwrap());
        assert!(pop.get(2).unwrap().is_none());
    }

    #[test]
    fn test_get_mut_clears_sorted_flag() {
        let mut rng = StdRng::seed_from_u64(15);
        let seeds = vec![seed(vec![false; 4]), seed(vec![true; 4])];
        let mut pop = Population::with_seeds(2, binary_spawner(4), seeds, &mut rng).unwrap();

        let worst = pop.get_mut(1).unwrap().unwrap();
        assert_eq!(worst.genome().genes(), vec![false; 4]);
        assert!(!pop.is_sorted());
    }

    #[test]
    fn test_best_on_empty_population_errors() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pop = Population::new(2, binary_spawner(3), &mut rng).unwrap();
        pop.truncate(0);
        assert_eq!(pop.best().err(), Some(EvolutionError::EmptyPopulation));
    }

    #[test]
    fn test_evaluate_fills_caches() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut pop = Population::new(5, binary_spawner(4), &mut rng).unwrap();
        assert!(pop.iter().all(|ind| !ind.is_evaluated()));

        pop.evaluate().unwrap();
        assert!(pop.iter().all(|ind| ind.is_evaluated()));
    }

    #[test]
    fn test_evaluate_init_leaves_caches_empty() {
        let mut rng = StdRng::seed_from_u64(11);
        let pop = Population::new(5, binary_spawner(4), &mut rng).unwrap();
        pop.evaluate_init().unwrap();
        assert!(pop.iter().all(|ind| !ind.is_evaluated()));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut pop = Population::new(3, binary_spawner(4), &mut rng).unwrap();
        pop.sort().unwrap();

        let mut copy = pop.clone();
        assert!(!copy.is_sorted());

        copy.push(seed(vec![true; 4]));
        assert_eq!(pop.len(), 3);
        assert_eq!(copy.len(), 4);
    }

    #[test]
    fn test_spawned_genomes_match_pool_length() {
        let pool = ListSpawningPool::binary(9).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        let genome = pool.create(&mut rng);
        assert_eq!(genome.len(), 9);
    }
}
