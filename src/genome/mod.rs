//! Genome representations

pub mod list;
pub mod traits;

pub use list::{Alleles, FiniteSetAlleles, IntervalAlleles, ListGenome};
pub use traits::Genome;
