//! Mutation operators for list genomes

use std::sync::Arc;

use rand::Rng;

use crate::error::{EvoResult, OperatorError};
use crate::genome::{Alleles, Genome, ListGenome};
use crate::operators::traits::Mutation;
use crate::population::Individual;

/// Swaps the genes at two random positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapGenes;

impl<A> Mutation<ListGenome<A>> for SwapGenes
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn perform<R: Rng>(
        &self,
        individual: &mut Individual<ListGenome<A>>,
        rng: &mut R,
    ) -> EvoResult<()> {
        let len = individual.genome().len();
        if len < 2 {
            return Ok(());
        }
        let i = rng.gen_range(0..len);
        let j = loop {
            let j = rng.gen_range(0..len);
            if j != i {
                break j;
            }
        };
        individual.genome_mut().swap(i, j);
        Ok(())
    }
}

/// Replaces one random gene with a fresh allele.
pub struct SingleGeneRandomValue<A> {
    alleles: Arc<dyn Alleles<A>>,
}

impl<A> SingleGeneRandomValue<A> {
    /// Mutation drawing replacement genes from `alleles`
    pub fn new(alleles: Arc<dyn Alleles<A>>) -> Self {
        Self { alleles }
    }
}

impl<A> Clone for SingleGeneRandomValue<A> {
    fn clone(&self) -> Self {
        Self {
            alleles: Arc::clone(&self.alleles),
        }
    }
}

impl<A> Mutation<ListGenome<A>> for SingleGeneRandomValue<A>
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn perform<R: Rng>(
        &self,
        individual: &mut Individual<ListGenome<A>>,
        rng: &mut R,
    ) -> EvoResult<()> {
        let len = individual.genome().len();
        if len == 0 {
            return Ok(());
        }
        let index = rng.gen_range(0..len);
        let value = self.alleles.draw(rng);
        individual.genome_mut().set(index, value);
        Ok(())
    }
}

/// Replaces `n` distinct random genes with fresh alleles.
pub struct NGeneRandomValue<A> {
    alleles: Arc<dyn Alleles<A>>,
    n: usize,
}

impl<A> NGeneRandomValue<A> {
    /// Mutation replacing `n` genes per application.
    ///
    /// Errors if `n` is zero.
    pub fn new(n: usize, alleles: Arc<dyn Alleles<A>>) -> EvoResult<Self> {
        if n == 0 {
            return Err(OperatorError::InvalidConfiguration(
                "mutation must replace at least one gene".to_string(),
            )
            .into());
        }
        Ok(Self { alleles, n })
    }
}

impl<A> Clone for NGeneRandomValue<A> {
    fn clone(&self) -> Self {
        Self {
            alleles: Arc::clone(&self.alleles),
            n: self.n,
        }
    }
}

impl<A> Mutation<ListGenome<A>> for NGeneRandomValue<A>
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn perform<R: Rng>(
        &self,
        individual: &mut Individual<ListGenome<A>>,
        rng: &mut R,
    ) -> EvoResult<()> {
        let len = individual.genome().len();
        if len == 0 {
            return Ok(());
        }
        let count = self.n.min(len);
        let indices = rand::seq::index::sample(rng, len, count);
        for index in indices {
            let value = self.alleles.draw(rng);
            individual.genome_mut().set(index, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::FiniteSetAlleles;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_swap_genes_preserves_multiset() {
        let mut rng = StdRng::seed_from_u64(1);
        let original = Individual::new(ListGenome::new(vec![1u8, 2, 3, 4, 5]));

        let mutated = SwapGenes.apply(&original, 1.0, &mut rng).unwrap();
        let mut genes = mutated.genome().genes().to_vec();
        genes.sort_unstable();
        assert_eq!(genes, vec![1, 2, 3, 4, 5]);
        assert_ne!(mutated.genome(), original.genome());
    }

    #[test]
    fn test_swap_genes_on_single_gene_is_noop() {
        let mut rng = StdRng::seed_from_u64(2);
        let original = Individual::new(ListGenome::new(vec![7u8]));
        let mutated = SwapGenes.apply(&original, 1.0, &mut rng).unwrap();
        assert_eq!(mutated.genome(), original.genome());
    }

    #[test]
    fn test_single_gene_random_value_changes_at_most_one_gene() {
        let alleles = Arc::new(FiniteSetAlleles::new(0u8..10).unwrap());
        let op = SingleGeneRandomValue::new(alleles);
        let original = Individual::new(ListGenome::new(vec![0u8; 6]));

        let mut rng = StdRng::seed_from_u64(3);
        let mutated = op.apply(&original, 1.0, &mut rng).unwrap();
        let changed = mutated
            .genome()
            .iter()
            .zip(original.genome().iter())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed <= 1);
    }

    #[test]
    fn test_n_gene_random_value_changes_at_most_n_genes() {
        let alleles = Arc::new(FiniteSetAlleles::new(1u8..=9).unwrap());
        let op = NGeneRandomValue::new(3, alleles).unwrap();
        let original = Individual::new(ListGenome::new(vec![0u8; 10]));

        let mut rng = StdRng::seed_from_u64(4);
        let mutated = op.apply(&original, 1.0, &mut rng).unwrap();
        let changed = mutated
            .genome()
            .iter()
            .zip(original.genome().iter())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed >= 1);
        assert!(changed <= 3);
    }

    #[test]
    fn test_n_gene_rejects_zero() {
        let alleles = Arc::new(FiniteSetAlleles::new(vec![0u8, 1]).unwrap());
        assert!(NGeneRandomValue::new(0, alleles).is_err());
    }

    #[test]
    fn test_mutation_never_touches_the_input() {
        let alleles = Arc::new(FiniteSetAlleles::new(1u8..=9).unwrap());
        let op = NGeneRandomValue::new(5, alleles).unwrap();
        let original = Individual::new(ListGenome::new(vec![0u8; 8]));

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let _ = op.apply(&original, 1.0, &mut rng).unwrap();
        }
        assert!(original.genome().iter().all(|&g| g == 0));
    }
}
