//! Selection operators
//!
//! Operators that pick parents from a population. All of them return
//! copies of the selected individuals and support selection with or
//! without repetition.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

use crate::error::{EvoResult, EvolutionError, OperatorError};
use crate::genome::Genome;
use crate::operators::traits::Selection;
use crate::population::{Individual, Population};

/// Selects the fittest individuals.
///
/// Without repetition the `n` distinct best are returned, best first.
/// With repetition the single best individual is returned `n` times.
#[derive(Debug, Clone, Copy)]
pub struct BestSelection {
    repetition: bool,
}

impl BestSelection {
    /// Selection of the distinct best individuals
    pub fn new() -> Self {
        Self { repetition: false }
    }

    /// Allow the same individual to be picked repeatedly
    pub fn with_repetition(mut self, repetition: bool) -> Self {
        self.repetition = repetition;
        self
    }
}

impl Default for BestSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Genome> Selection<G> for BestSelection {
    fn allows_repetition(&self) -> bool {
        self.repetition
    }

    fn perform<R: Rng>(
        &self,
        population: &mut Population<G>,
        n: usize,
        _rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>> {
        population.sort()?;
        let individuals = population.individuals();
        if self.repetition {
            let best = individuals
                .first()
                .ok_or(EvolutionError::EmptyPopulation)?;
            Ok(vec![best.clone(); n])
        } else {
            Ok(individuals.iter().take(n).cloned().collect())
        }
    }
}

/// Tournament selection.
///
/// Each pick samples `sample_size` random candidates and keeps the
/// fittest of them. Without repetition a winner leaves the candidate
/// pool for subsequent picks.
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
    sample_size: usize,
    repetition: bool,
}

impl TournamentSelection {
    /// Tournament over `sample_size` candidates per pick
    pub fn new(sample_size: usize) -> EvoResult<Self> {
        if sample_size < 1 {
            return Err(OperatorError::InvalidConfiguration(
                "tournament sample size must be at least 1".to_string(),
            )
            .into());
        }
        Ok(Self {
            sample_size,
            repetition: false,
        })
    }

    /// Allow the same individual to win several tournaments
    pub fn with_repetition(mut self, repetition: bool) -> Self {
        self.repetition = repetition;
        self
    }
}

impl<G: Genome> Selection<G> for TournamentSelection {
    fn allows_repetition(&self) -> bool {
        self.repetition
    }

    fn perform<R: Rng>(
        &self,
        population: &mut Population<G>,
        n: usize,
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>> {
        let fitnesses = population.fitness_values()?;
        let mut pool: Vec<usize> = (0..population.len()).collect();
        let mut selected = Vec::with_capacity(n);

        for _ in 0..n {
            // a pool smaller than the sample is contested whole
            let winner = pool
                .choose_multiple(rng, self.sample_size)
                .copied()
                .max_by(|&a, &b| fitnesses[a].total_cmp(&fitnesses[b]))
                .ok_or(EvolutionError::EmptyPopulation)?;
            selected.push(
                population
                    .individuals()
                    .get(winner)
                    .ok_or(EvolutionError::EmptyPopulation)?
                    .clone(),
            );
            if !self.repetition {
                pool.retain(|&idx| idx != winner);
            }
        }
        Ok(selected)
    }
}

/// Selects individuals uniformly at random, ignoring fitness.
#[derive(Debug, Clone, Copy)]
pub struct UniformSelection {
    repetition: bool,
}

impl UniformSelection {
    /// Uniform selection without repetition
    pub fn new() -> Self {
        Self { repetition: false }
    }

    /// Allow the same individual to be picked repeatedly
    pub fn with_repetition(mut self, repetition: bool) -> Self {
        self.repetition = repetition;
        self
    }
}

impl Default for UniformSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Genome> Selection<G> for UniformSelection {
    fn allows_repetition(&self) -> bool {
        self.repetition
    }

    fn perform<R: Rng>(
        &self,
        population: &mut Population<G>,
        n: usize,
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>> {
        let len = population.len();
        if len == 0 {
            return Err(EvolutionError::EmptyPopulation);
        }
        let indices: Vec<usize> = if self.repetition {
            (0..n).map(|_| rng.gen_range(0..len)).collect()
        } else {
            rand::seq::index::sample(rng, len, n).into_vec()
        };
        indices
            .into_iter()
            .map(|idx| {
                population
                    .individuals()
                    .get(idx)
                    .cloned()
                    .ok_or(EvolutionError::EmptyPopulation)
            })
            .collect()
    }
}

/// Rank-proportional selection.
///
/// Individuals are weighted by their rank in the fitness order, so the
/// best has weight `len` and the worst weight 1. Selection pressure is
/// independent of the fitness scale.
#[derive(Debug, Clone, Copy)]
pub struct RankSelection {
    repetition: bool,
}

impl RankSelection {
    /// Rank-proportional selection without repetition
    pub fn new() -> Self {
        Self { repetition: false }
    }

    /// Allow the same individual to be picked repeatedly
    pub fn with_repetition(mut self, repetition: bool) -> Self {
        self.repetition = repetition;
        self
    }
}

impl Default for RankSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Genome> Selection<G> for RankSelection {
    fn allows_repetition(&self) -> bool {
        self.repetition
    }

    fn perform<R: Rng>(
        &self,
        population: &mut Population<G>,
        n: usize,
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<G>>> {
        population.sort()?;
        // descending order, so position 0 carries the heaviest weight
        let mut weights: Vec<f64> = (1..=population.len()).rev().map(|r| r as f64).collect();
        let mut selected = Vec::with_capacity(n);

        for _ in 0..n {
            let dist = WeightedIndex::new(weights.iter()).map_err(|e| {
                OperatorError::InvalidConfiguration(format!("rank weights: {e}"))
            })?;
            let idx = dist.sample(rng);
            // the weights were built over the sorted order, so the drawn
            // index is a rank
            selected.push(
                population
                    .individuals()
                    .get(idx)
                    .ok_or(EvolutionError::EmptyPopulation)?
                    .clone(),
            );
            if !self.repetition {
                weights[idx] = 0.0;
            }
        }
        Ok(selected)
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

    /// Population of 8 individuals with fitness 0..=7
    fn graded_population() -> Population<ListGenome<bool>> {
        let pool = Arc::new(ListSpawningPool::binary(8).unwrap());
        let spawner = Spawner::new(pool, Arc::new(OneMax));
        let seeds = (0..8)
            .map(|ones| {
                let bits = (0..8).map(|i| i < ones).collect();
                Individual::new(ListGenome::new(bits))
            })
            .collect();
        let mut rng = StdRng::seed_from_u64(0);
        Population::with_seeds(8, spawner, seeds, &mut rng).unwrap()
    }

    fn fitness_of(ind: &Individual<ListGenome<bool>>) -> f64 {
        ind.genome().count_ones() as f64
    }

    #[test]
    fn test_best_selection_returns_top_individuals() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(1);

        let picked = BestSelection::new().select(&mut pop, 3, &mut rng).unwrap();
        let fitnesses: Vec<f64> = picked.iter().map(fitness_of).collect();
        assert_eq!(fitnesses, vec![7.0, 6.0, 5.0]);
    }

    #[test]
    fn test_best_selection_with_repetition_repeats_champion() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(2);

        let picked = BestSelection::new()
            .with_repetition(true)
            .select(&mut pop, 4, &mut rng)
            .unwrap();
        assert!(picked.iter().all(|ind| fitness_of(ind) == 7.0));
    }

    #[test]
    fn test_selection_size_error_without_repetition() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(3);

        let err = BestSelection::new()
            .select(&mut pop, 9, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Operator(OperatorError::SelectionSize { .. })
        ));
    }

    #[test]
    fn test_tournament_selection_without_repetition_is_distinct() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(4);

        let picked = TournamentSelection::new(3)
            .unwrap()
            .select(&mut pop, 8, &mut rng)
            .unwrap();
        let mut fitnesses: Vec<f64> = picked.iter().map(fitness_of).collect();
        fitnesses.sort_by(f64::total_cmp);
        // all 8 distinct individuals were exhausted
        assert_eq!(fitnesses, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_tournament_prefers_fit_individuals() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(5);

        let tournament = TournamentSelection::new(4).unwrap().with_repetition(true);
        let picked = tournament.select(&mut pop, 200, &mut rng).unwrap();
        let mean: f64 =
            picked.iter().map(fitness_of).sum::<f64>() / picked.len() as f64;
        // uniform picking would average 3.5
        assert!(mean > 4.5, "tournament mean fitness was only {mean}");
    }

    #[test]
    fn test_tournament_rejects_zero_sample() {
        assert!(TournamentSelection::new(0).is_err());
    }

    #[test]
    fn test_uniform_selection_without_repetition_is_distinct() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(6);

        let picked = UniformSelection::new().select(&mut pop, 8, &mut rng).unwrap();
        let mut fitnesses: Vec<f64> = picked.iter().map(fitness_of).collect();
        fitnesses.sort_by(f64::total_cmp);
        assert_eq!(fitnesses, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_rank_selection_prefers_fit_individuals() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(7);

        let rank = RankSelection::new().with_repetition(true);
        let picked = rank.select(&mut pop, 200, &mut rng).unwrap();
        let mean: f64 =
            picked.iter().map(fitness_of).sum::<f64>() / picked.len() as f64;
        assert!(mean > 4.0, "rank selection mean fitness was only {mean}");
    }

    #[test]
    fn test_rank_selection_without_repetition_is_distinct() {
        let mut pop = graded_population();
        let mut rng = StdRng::seed_from_u64(8);

        let picked = RankSelection::new().select(&mut pop, 8, &mut rng).unwrap();
        let mut fitnesses: Vec<f64> = picked.iter().map(fitness_of).collect();
        fitnesses.sort_by(f64::total_cmp);
        assert_eq!(fitnesses, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
