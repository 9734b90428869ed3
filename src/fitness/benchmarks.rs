//! Benchmark fitness functions
//!
//! Standard test problems for exercising and comparing operators.

use crate::fitness::Fitness;
use crate::genome::ListGenome;

/// OneMax: the number of `true` genes in a binary genome.
///
/// The global optimum is the all-ones string with fitness equal to the
/// genome length.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneMax;

impl Fitness<ListGenome<bool>> for OneMax {
    fn evaluate(&self, genome: &ListGenome<bool>) -> f64 {
        genome.count_ones() as f64
    }
}

/// Negated sphere function over a real-valued genome.
///
/// Fitness is `-sum(x_i^2)`, so the global optimum is the origin with
/// fitness 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl Fitness<ListGenome<f64>> for Sphere {
    fn evaluate(&self, genome: &ListGenome<f64>) -> f64 {
        -genome.genes().iter().map(|x| x * x).sum::<f64>()
    }
}
