//! Replacement operators
//!
//! Strategies for merging offspring back into a population of fixed size.

use crate::error::EvoResult;
use crate::genome::Genome;
use crate::operators::traits::Replacement;
use crate::population::{Individual, Population};

/// Offspring always enter; the worst incumbents leave.
///
/// One incumbent is dropped per offspring, so the best offspring of a bad
/// generation still displaces the worst incumbent. The population's best
/// individual is only at risk when the offspring batch is as large as the
/// population itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowElitism;

impl<G: Genome> Replacement<G> for LowElitism {
    fn replace(
        &self,
        population: &mut Population<G>,
        offspring: Vec<Individual<G>>,
    ) -> EvoResult<()> {
        if offspring.is_empty() {
            return Ok(());
        }
        population.drop_worst(offspring.len())?;
        population.extend(offspring);
        Ok(())
    }
}

/// Offspring compete with incumbents; only the fittest survive.
///
/// The merged pool is sorted and cut back to the population size, so an
/// offspring enters only by beating an incumbent. The population's best
/// fitness can never decrease.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighElitism;

impl<G: Genome> Replacement<G> for HighElitism {
    fn replace(
        &self,
        population: &mut Population<G>,
        offspring: Vec<Individual<G>>,
    ) -> EvoResult<()> {
        if offspring.is_empty() {
            return Ok(());
        }
        population.extend(offspring);
        let excess = population.len().saturating_sub(population.size());
        population.drop_worst(excess)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::OneMax;
    use crate::genome::ListGenome;
    use crate::population::{ListSpawningPool, Spawner};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn individual(ones: usize, len: usize) -> Individual<ListGenome<bool>> {
        let bits = (0..len).map(|i| i < ones).collect();
        Individual::new(ListGenome::new(bits))
    }

    /// Population of `n` individuals with fitness 0..n
    fn graded_population(n: usize) -> Population<ListGenome<bool>> {
        let pool = Arc::new(ListSpawningPool::binary(n).unwrap());
        let spawner = Spawner::new(pool, Arc::new(OneMax));
        let seeds = (0..n).map(|ones| individual(ones, n)).collect();
        let mut rng = StdRng::seed_from_u64(0);
        Population::with_seeds(n, spawner, seeds, &mut rng).unwrap()
    }

    fn fitnesses(pop: &mut Population<ListGenome<bool>>) -> Vec<f64> {
        pop.fitness_values().unwrap()
    }

    #[test]
    fn test_low_elitism_drops_the_worst_incumbents() {
        let mut pop = graded_population(6);
        // two poor offspring still enter
        let offspring = vec![individual(0, 6), individual(1, 6)];

        LowElitism.replace(&mut pop, offspring).unwrap();
        assert_eq!(pop.len(), 6);

        pop.sort().unwrap();
        let values = fitnesses(&mut pop);
        // incumbents 0 and 1 were dropped, offspring 0 and 1 entered
        assert_eq!(values, vec![5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_low_elitism_with_uniformly_fitter_offspring() {
        let pool = Arc::new(ListSpawningPool::binary(6).unwrap());
        let spawner = Spawner::new(pool, Arc::new(OneMax));
        let seeds = (0..3).map(|ones| individual(ones, 6)).collect();
        let mut rng = StdRng::seed_from_u64(2);
        let mut pop = Population::with_seeds(3, spawner, seeds, &mut rng).unwrap();

        // a full batch, every offspring fitter than every incumbent
        let offspring = vec![individual(4, 6), individual(5, 6), individual(6, 6)];

        LowElitism.replace(&mut pop, offspring).unwrap();
        assert_eq!(pop.len(), 3);

        // the incumbents are gone and the worst survivor is the
        // offspring's own worst
        assert_eq!(pop.worst().unwrap().cached_fitness(), Some(4.0));
        assert_eq!(pop.best().unwrap().cached_fitness(), Some(6.0));
    }

    #[test]
    fn test_low_elitism_keeps_best_for_partial_offspring() {
        let mut pop = graded_population(6);
        let offspring = vec![individual(0, 6)];

        LowElitism.replace(&mut pop, offspring).unwrap();
        pop.sort().unwrap();
        assert_eq!(pop.best().unwrap().cached_fitness(), Some(5.0));
    }

    #[test]
    fn test_high_elitism_admits_only_winners() {
        let mut pop = graded_population(6);
        // one great offspring, one hopeless one
        let offspring = vec![individual(6, 6), individual(0, 6)];

        HighElitism.replace(&mut pop, offspring).unwrap();
        assert_eq!(pop.len(), 6);

        let mut values = fitnesses(&mut pop);
        values.sort_by(f64::total_cmp);
        // the two zero-fitness individuals lost to the merged pool's best six
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_high_elitism_keeps_incumbents_against_worse_offspring() {
        let pool = Arc::new(ListSpawningPool::binary(6).unwrap());
        let spawner = Spawner::new(pool, Arc::new(OneMax));
        let seeds = (3..=6).map(|ones| individual(ones, 6)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let mut pop = Population::with_seeds(4, spawner, seeds, &mut rng).unwrap();

        // uniformly worse offspring change nothing but the order
        let offspring = vec![individual(0, 6), individual(1, 6)];
        HighElitism.replace(&mut pop, offspring).unwrap();

        let mut values = fitnesses(&mut pop);
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_high_elitism_never_lowers_best_fitness() {
        let mut pop = graded_population(6);
        let before = pop.best().unwrap().cached_fitness().unwrap();

        let offspring = vec![individual(0, 6), individual(1, 6), individual(2, 6)];
        HighElitism.replace(&mut pop, offspring).unwrap();

        let after = pop.best().unwrap().cached_fitness().unwrap();
        assert!(after >= before);
    }

    #[test]
    fn test_empty_offspring_is_a_noop() {
        let mut pop = graded_population(4);
        pop.sort().unwrap();
        let before: Vec<f64> = fitnesses(&mut pop);

        LowElitism.replace(&mut pop, Vec::new()).unwrap();
        // still sorted: the early return never touched the population
        assert!(pop.is_sorted());
        assert_eq!(fitnesses(&mut pop), before);

        HighElitism.replace(&mut pop, Vec::new()).unwrap();
        assert!(pop.is_sorted());
    }

    #[test]
    fn test_replacement_preserves_population_size() {
        for k in [1, 2, 3, 4] {
            let mut pop = graded_population(4);
            let offspring = (0..k).map(|_| individual(2, 4)).collect();
            LowElitism.replace(&mut pop, offspring).unwrap();
            assert_eq!(pop.len(), 4);

            let mut pop = graded_population(4);
            let offspring = (0..k).map(|_| individual(2, 4)).collect();
            HighElitism.replace(&mut pop, offspring).unwrap();
            assert_eq!(pop.len(), 4);
        }
    }
}
