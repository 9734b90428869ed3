//! Diversity measures

use crate::error::{EvoResult, OperatorError};
use crate::genome::{Genome, ListGenome};
use crate::operators::traits::Diversity;
use crate::population::Population;

/// Mean pairwise genome distance.
///
/// Uses [`Genome::distance`], so the scale depends on the representation's
/// metric. Populations with fewer than two individuals measure 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageDistance;

impl<G: Genome> Diversity<G> for AverageDistance {
    fn measure(&self, population: &Population<G>) -> EvoResult<f64> {
        let individuals = population.individuals();
        let n = individuals.len();
        if n < 2 {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                total += individuals[i].genome().distance(individuals[j].genome());
            }
        }
        let pairs = (n * (n - 1) / 2) as f64;
        Ok(total / pairs)
    }
}

/// Fraction of per-locus allele variety in a list-genome population.
///
/// For each gene position the number of distinct values across the
/// population is counted; `(distinct - 1) / (n - 1)` averaged over all
/// positions yields 0 for a uniform population and 1 when every
/// individual differs at every position.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferentGenes;

impl<A> Diversity<ListGenome<A>> for DifferentGenes
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn measure(&self, population: &Population<ListGenome<A>>) -> EvoResult<f64> {
        let individuals = population.individuals();
        let n = individuals.len();
        if n < 2 {
            return Ok(0.0);
        }

        let genome_len = individuals[0].genome().len();
        if individuals
            .iter()
            .any(|ind| ind.genome().len() != genome_len)
        {
            return Err(OperatorError::StructureMismatch(
                "diversity over genomes of unequal length".to_string(),
            )
            .into());
        }
        if genome_len == 0 {
            return Ok(0.0);
        }

        let mut total = 0.0;
        for locus in 0..genome_len {
            let mut distinct: Vec<&A> = Vec::new();
            for ind in individuals {
                if let Some(value) = ind.genome().get(locus) {
                    if !distinct.contains(&value) {
                        distinct.push(value);
                    }
                }
            }
            total += (distinct.len() - 1) as f64 / (n - 1) as f64;
        }
        Ok(total / genome_len as f64)
    }
}
