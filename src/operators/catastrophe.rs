//! Catastrophe operators
//!
//! Rare population-wide events that reintroduce genetic diversity.

use rand::Rng;

use crate::error::{EvoResult, EvolutionError};
use crate::genome::Genome;
use crate::operators::traits::Catastrophe;
use crate::population::Population;

fn checked_probability(p: f64) -> EvoResult<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(EvolutionError::InvalidProbability {
            name: "catastrophe probability",
            value: p,
        });
    }
    Ok(p)
}

/// A catastrophe that never strikes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCatastrophe;

impl<G: Genome> Catastrophe<G> for NoCatastrophe {
    fn apply<R: Rng>(&self, _population: &mut Population<G>, _rng: &mut R) -> EvoResult<()> {
        Ok(())
    }
}

/// With some probability, replaces duplicated individuals with fresh spawns.
///
/// Only the first occurrence of each genome survives; the freed slots are
/// filled from the population's spawner.
#[derive(Debug, Clone, Copy)]
pub struct PackingByProbability {
    p: f64,
}

impl PackingByProbability {
    /// Packing that strikes with probability `p` per application
    pub fn new(p: f64) -> EvoResult<Self> {
        Ok(Self {
            p: checked_probability(p)?,
        })
    }
}

impl<G: Genome> Catastrophe<G> for PackingByProbability {
    fn apply<R: Rng>(&self, population: &mut Population<G>, rng: &mut R) -> EvoResult<()> {
        if rng.gen::<f64>() >= self.p {
            return Ok(());
        }

        let mut duplicates = Vec::new();
        {
            let individuals = population.individuals();
            for i in 0..individuals.len() {
                if individuals[..i].iter().any(|other| other == &individuals[i]) {
                    duplicates.push(i);
                }
            }
        }
        for &i in duplicates.iter().rev() {
            population.remove(i);
        }

        let spawner = population.spawner().clone();
        while population.len() < population.size() {
            population.push(spawner.spawn(rng));
        }
        Ok(())
    }
}

/// With some probability, wipes out everyone but the best individual.
///
/// The survivors' slots are refilled from the population's spawner, giving
/// evolution an almost fresh start anchored at the current optimum.
#[derive(Debug, Clone, Copy)]
pub struct DoomsdayByProbability {
    p: f64,
}

impl DoomsdayByProbability {
    /// Doomsday that strikes with probability `p` per application
    pub fn new(p: f64) -> EvoResult<Self> {
        Ok(Self {
            p: checked_probability(p)?,
        })
    }
}

impl<G: Genome> Catastrophe<G> for DoomsdayByProbability {
    fn apply<R: Rng>(&self, population: &mut Population<G>, rng: &mut R) -> EvoResult<()> {
        if rng.gen::<f64>() >= self.p {
            return Ok(());
        }
        if population.is_empty() {
            return Ok(());
        }

        population.drop_worst(population.len() - 1)?;

        let spawner = population.spawner().clone();
        while population.len() < population.size() {
            population.push(spawner.spawn(rng));
        }
        Ok(())
    }
}
