//! Recombination operators for list genomes
//!
//! All operators here combine two equal-length parents into two progeny.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{EvoResult, EvolutionError, OperatorError};
use crate::genome::{Genome, ListGenome};
use crate::operators::traits::Recombination;
use crate::population::Individual;

type Pair<A> = (Individual<ListGenome<A>>, Individual<ListGenome<A>>);

/// Clone both parents after checking they have the same length
fn cloned_pair<A>(parents: &[Individual<ListGenome<A>>]) -> EvoResult<Pair<A>>
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    if parents.len() != 2 {
        return Err(OperatorError::ArityMismatch {
            expected: 2,
            actual: parents.len(),
        }
        .into());
    }
    let (a, b) = (&parents[0], &parents[1]);
    if a.genome().len() != b.genome().len() {
        return Err(OperatorError::StructureMismatch(format!(
            "parents have lengths {} and {}",
            a.genome().len(),
            b.genome().len()
        ))
        .into());
    }
    Ok((a.clone(), b.clone()))
}

/// One-point recombination.
///
/// A cut point is chosen and the parents exchange their suffixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnePointRecombination;

impl<A> Recombination<ListGenome<A>> for OnePointRecombination
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn recombine<R: Rng>(
        &self,
        parents: &[Individual<ListGenome<A>>],
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<ListGenome<A>>>> {
        let (mut child1, mut child2) = cloned_pair(parents)?;
        let len = child1.genome().len();
        if len >= 2 {
            let cut = rng.gen_range(1..len);
            let g1 = child1.genome_mut().genes_mut();
            let g2 = child2.genome_mut().genes_mut();
            for i in cut..len {
                std::mem::swap(&mut g1[i], &mut g2[i]);
            }
        }
        Ok(vec![child1, child2])
    }
}

/// Two-point recombination.
///
/// Two cut points are chosen and the parents exchange the segment
/// between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPointRecombination;

impl<A> Recombination<ListGenome<A>> for TwoPointRecombination
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn recombine<R: Rng>(
        &self,
        parents: &[Individual<ListGenome<A>>],
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<ListGenome<A>>>> {
        let (mut child1, mut child2) = cloned_pair(parents)?;
        let len = child1.genome().len();
        if len >= 3 {
            let cuts: Vec<usize> = (1..len).collect();
            let mut picked: Vec<usize> = cuts.choose_multiple(rng, 2).copied().collect();
            picked.sort_unstable();
            let (lo, hi) = (picked[0], picked[1]);
            let g1 = child1.genome_mut().genes_mut();
            let g2 = child2.genome_mut().genes_mut();
            for i in lo..hi {
                std::mem::swap(&mut g1[i], &mut g2[i]);
            }
        }
        Ok(vec![child1, child2])
    }
}

/// Random-mask recombination.
///
/// Every gene position independently swaps between the progeny with the
/// configured probability.
#[derive(Debug, Clone, Copy)]
pub struct UniformRecombination {
    p: f64,
}

impl UniformRecombination {
    /// Uniform recombination with the standard 0.5 swap probability
    pub fn new() -> Self {
        Self { p: 0.5 }
    }

    /// Uniform recombination with a custom per-gene swap probability
    pub fn with_probability(p: f64) -> EvoResult<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(EvolutionError::InvalidProbability {
                name: "gene swap probability",
                value: p,
            });
        }
        Ok(Self { p })
    }
}

impl Default for UniformRecombination {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Recombination<ListGenome<A>> for UniformRecombination
where
    A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn recombine<R: Rng>(
        &self,
        parents: &[Individual<ListGenome<A>>],
        rng: &mut R,
    ) -> EvoResult<Vec<Individual<ListGenome<A>>>> {
        let (mut child1, mut child2) = cloned_pair(parents)?;
        let len = child1.genome().len();
        let g1 = child1.genome_mut().genes_mut();
        let g2 = child2.genome_mut().genes_mut();
        for i in 0..len {
            if rng.gen::<f64>() < self.p {
                std::mem::swap(&mut g1[i], &mut g2[i]);
            }
        }
        Ok(vec![child1, child2])
    }
}
