//! List-based genome representation
//!
//! A `ListGenome` holds a fixed-length sequence of genes drawn from an
//! allele provider. This covers binary strings, integer vectors, categorical
//! chromosomes and real-valued vectors with a single representation.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, OperatorError};
use crate::genome::traits::Genome;

/// A source of gene values for list genomes.
///
/// Allele providers are shared between spawning pools and mutations, so a
/// genome created and a genome mutated draw from the same value domain.
pub trait Alleles<A>: Send + Sync {
    /// Draw one random allele
    fn draw(&self, rng: &mut dyn RngCore) -> A;
}

/// Alleles drawn uniformly from a finite set of values.
#[derive(Debug, Clone)]
pub struct FiniteSetAlleles<A> {
    values: Vec<A>,
}

impl<A: Clone + PartialEq> FiniteSetAlleles<A> {
    /// Create a provider from the given values.
    ///
    /// Duplicate values are dropped so every distinct value keeps the same
    /// draw probability. Errors if `values` is empty.
    pub fn new(values: impl IntoIterator<Item = A>) -> EvoResult<Self> {
        let mut distinct: Vec<A> = Vec::new();
        for value in values {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        if distinct.is_empty() {
            return Err(OperatorError::InvalidConfiguration(
                "finite set alleles require at least one value".to_string(),
            )
            .into());
        }
        Ok(Self { values: distinct })
    }

    /// The distinct values this provider draws from
    pub fn values(&self) -> &[A] {
        &self.values
    }
}

impl FiniteSetAlleles<bool> {
    /// Convenience constructor for binary genomes ({false, true}).
    pub fn binary() -> Self {
        Self {
            values: vec![false, true],
        }
    }
}

impl<A: Clone + Send + Sync> Alleles<A> for FiniteSetAlleles<A> {
    fn draw(&self, rng: &mut dyn RngCore) -> A {
        let idx = rng.gen_range(0..self.values.len());
        self.values[idx].clone()
    }
}

/// Alleles drawn uniformly from a closed real interval.
#[derive(Debug, Clone, Copy)]
pub struct IntervalAlleles {
    lower: f64,
    upper: f64,
}

impl IntervalAlleles {
    /// Create a provider for the interval `[lower, upper]`.
    ///
    /// Errors if the bounds are not finite or `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> EvoResult<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(OperatorError::InvalidConfiguration(format!(
                "invalid allele interval [{lower}, {upper}]"
            ))
            .into());
        }
        Ok(Self { lower, upper })
    }

    /// Lower bound of the interval
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound of the interval
    pub fn upper(&self) -> f64 {
        self.upper
    }
}

impl Alleles<f64> for IntervalAlleles {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        rng.gen_range(self.lower..=self.upper)
    }
}

/// Fixed-length sequence genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListGenome<A> {
    genes: Vec<A>,
}

impl<A> ListGenome<A> {
    /// Create a genome from a vector of genes
    pub fn new(genes: Vec<A>) -> Self {
        Self { genes }
    }

    /// Generate a random genome of the given length from an allele provider
    pub fn random<R: Rng>(alleles: &dyn Alleles<A>, len: usize, rng: &mut R) -> Self {
        let genes = (0..len).map(|_| alleles.draw(rng)).collect();
        Self { genes }
    }

    /// The genes as a slice
    pub fn genes(&self) -> &[A] {
        &self.genes
    }

    /// The genes as a mutable slice
    pub fn genes_mut(&mut self) -> &mut [A] {
        &mut self.genes
    }

    /// Gene at the given position
    pub fn get(&self, index: usize) -> Option<&A> {
        self.genes.get(index)
    }

    /// Overwrite the gene at the given position
    pub fn set(&mut self, index: usize, value: A) {
        self.genes[index] = value;
    }

    /// Swap the genes at two positions
    pub fn swap(&mut self, i: usize, j: usize) {
        self.genes.swap(i, j);
    }

    /// Iterate over the genes
    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.genes.iter()
    }
}

impl ListGenome<bool> {
    /// Count the genes set to `true`
    pub fn count_ones(&self) -> usize {
        self.genes.iter().filter(|&&b| b).count()
    }
}

impl<A: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static> Genome for ListGenome<A> {
    type Allele = A;
    type Phenotype = Vec<A>;

    fn len(&self) -> usize {
        self.genes.len()
    }

    fn decode(&self) -> Vec<A> {
        self.genes.clone()
    }

    /// Hamming distance: differing positions plus any length difference
    fn distance(&self, other: &Self) -> f64 {
        let differing = self
            .genes
            .iter()
            .zip(other.genes.iter())
            .filter(|(a, b)| a != b)
            .count();
        let length_gap = self.genes.len().abs_diff(other.genes.len());
        (differing + length_gap) as f64
    }
}

impl<A> From<Vec<A>> for ListGenome<A> {
    fn from(genes: Vec<A>) -> Self {
        Self::new(genes)
    }
}
