//! Genetic operators

pub mod catastrophe;
pub mod diversity;
pub mod mutation;
pub mod recombination;
pub mod replacement;
pub mod selection;
pub mod traits;

pub use catastrophe::{DoomsdayByProbability, NoCatastrophe, PackingByProbability};
pub use diversity::{AverageDistance, DifferentGenes};
pub use mutation::{NGeneRandomValue, SingleGeneRandomValue, SwapGenes};
pub use recombination::{OnePointRecombination, TwoPointRecombination, UniformRecombination};
pub use replacement::{HighElitism, LowElitism};
pub use selection::{BestSelection, RankSelection, TournamentSelection, UniformSelection};
pub use traits::{Catastrophe, Diversity, Mutation, Recombination, Replacement, Selection};
