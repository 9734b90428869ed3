//! Core genome traits
//!
//! This module defines the `Genome` trait that all solution representations
//! implement. Genomes must be cloneable, comparable, and thread-safe.

/// Core genome abstraction for evolutionary algorithms.
///
/// A genome is the genetic material an individual carries. Operators act
/// on genomes; fitness functions interpret them. Equality compares genetic
/// content only, never fitness.
pub trait Genome: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// The allele type for individual genes
    type Allele: Clone + Send + Sync;

    /// The decoded solution this genome encodes
    type Phenotype;

    /// Number of genes in this genome
    fn len(&self) -> usize;

    /// Decode the genome into its domain solution.
    ///
    /// Pure: decoding must not depend on anything but the genes.
    fn decode(&self) -> Self::Phenotype;

    /// Whether the genome carries no genes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance metric between two genomes (default: 0.0)
    fn distance(&self, _other: &Self) -> f64 {
        0.0
    }
}
