//! Population management

pub mod individual;
#[allow(clippy::module_inception)]
pub mod population;
pub mod spawning_pool;

pub use individual::Individual;
pub use population::Population;
pub use spawning_pool::{ListSpawningPool, Spawner, SpawningPool};
