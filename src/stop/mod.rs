//! Stop conditions
//!
//! This module provides the criteria that tell a running algorithm when to
//! finish, plus combinators to compose them.

use crate::genome::Genome;
use crate::population::Population;

/// Run state offered to stop conditions.
#[derive(Debug)]
pub struct RunState<'a, G: Genome> {
    /// Completed generations so far
    pub generation: usize,
    /// Best fitness found so far
    pub best_fitness: f64,
    /// The evolving populations
    pub populations: &'a [Population<G>],
    /// Best fitness per generation, cumulative
    pub fitness_history: &'a [f64],
}

/// Stop condition trait
pub trait StopCondition<G: Genome>: Send + Sync {
    /// Check whether the run should stop
    fn should_stop(&self, state: &RunState<G>) -> bool;

    /// Get a description of why the run stopped
    fn reason(&self) -> &'static str;
}

/// Stop after a fixed number of generations
#[derive(Clone, Debug)]
pub struct StepsNum(pub usize);

impl StepsNum {
    /// Stop once `steps` generations have completed
    pub fn new(steps: usize) -> Self {
        Self(steps)
    }
}

impl<G: Genome> StopCondition<G> for StepsNum {
    fn should_stop(&self, state: &RunState<G>) -> bool {
        state.generation >= self.0
    }

    fn reason(&self) -> &'static str {
        "generation limit reached"
    }
}

/// Stop once the best fitness reaches a bound
#[derive(Clone, Debug)]
pub struct FitnessBound(pub f64);

impl FitnessBound {
    /// Stop when the best fitness is at least `bound`
    pub fn new(bound: f64) -> Self {
        Self(bound)
    }
}

impl<G: Genome> StopCondition<G> for FitnessBound {
    fn should_stop(&self, state: &RunState<G>) -> bool {
        state.best_fitness >= self.0
    }

    fn reason(&self) -> &'static str {
        "fitness bound reached"
    }
}

/// Stop when the best fitness stops improving
#[derive(Clone, Debug)]
pub struct FitnessStagnation {
    /// Number of generations to look back
    pub window: usize,
    /// Minimum improvement over the window
    pub epsilon: f64,
}

impl FitnessStagnation {
    /// Stop when the best fitness improves by less than `epsilon` over
    /// `window` generations
    pub fn new(window: usize, epsilon: f64) -> Self {
        Self { window, epsilon }
    }
}

impl<G: Genome> StopCondition<G> for FitnessStagnation {
    fn should_stop(&self, state: &RunState<G>) -> bool {
        if state.fitness_history.len() < self.window || self.window == 0 {
            return false;
        }
        let window = &state.fitness_history[state.fitness_history.len() - self.window..];
        let improvement = (window[window.len() - 1] - window[0]).abs();
        improvement < self.epsilon
    }

    fn reason(&self) -> &'static str {
        "fitness stagnation detected"
    }
}

/// Combine conditions with OR logic (any one stops the run)
pub struct AnyOf<G: Genome> {
    conditions: Vec<Box<dyn StopCondition<G>>>,
}

impl<G: Genome> AnyOf<G> {
    /// Create a new OR combinator
    pub fn new(conditions: Vec<Box<dyn StopCondition<G>>>) -> Self {
        Self { conditions }
    }
}

impl<G: Genome> StopCondition<G> for AnyOf<G> {
    fn should_stop(&self, state: &RunState<G>) -> bool {
        self.conditions.iter().any(|c| c.should_stop(state))
    }

    fn reason(&self) -> &'static str {
        "one of multiple conditions met"
    }
}

/// Combine conditions with AND logic (all must hold to stop)
pub struct AllOf<G: Genome> {
    conditions: Vec<Box<dyn StopCondition<G>>>,
}

impl<G: Genome> AllOf<G> {
    /// Create a new AND combinator
    pub fn new(conditions: Vec<Box<dyn StopCondition<G>>>) -> Self {
        Self { conditions }
    }
}

impl<G: Genome> StopCondition<G> for AllOf<G> {
    fn should_stop(&self, state: &RunState<G>) -> bool {
        !self.conditions.is_empty() && self.conditions.iter().all(|c| c.should_stop(state))
    }

    fn reason(&self) -> &'static str {
        "all conditions met"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::ListGenome;

    fn state<'a>(
        generation: usize,
        best_fitness: f64,
        fitness_history: &'a [f64],
    ) -> RunState<'a, ListGenome<bool>> {
        RunState {
            generation,
            best_fitness,
            populations: &[],
            fitness_history,
        }
    }

    #[test]
    fn test_steps_num() {
        let condition = StepsNum::new(5);
        assert!(!condition.should_stop(&state(4, 0.0, &[])));
        assert!(condition.should_stop(&state(5, 0.0, &[])));
        assert!(condition.should_stop(&state(6, 0.0, &[])));
    }

    #[test]
    fn test_fitness_bound() {
        let condition = FitnessBound::new(10.0);
        assert!(!condition.should_stop(&state(0, 9.9, &[])));
        assert!(condition.should_stop(&state(0, 10.0, &[])));
        assert!(condition.should_stop(&state(0, 12.0, &[])));
    }

    #[test]
    fn test_fitness_stagnation() {
        let condition = FitnessStagnation::new(3, 0.01);

        // not enough history yet
        assert!(!condition.should_stop(&state(2, 2.0, &[1.0, 2.0])));
        // still improving
        assert!(!condition.should_stop(&state(3, 3.0, &[1.0, 2.0, 3.0])));
        // flat window
        assert!(condition.should_stop(&state(5, 3.0, &[1.0, 2.0, 3.0, 3.0, 3.0])));
    }

    #[test]
    fn test_any_of() {
        let condition: AnyOf<ListGenome<bool>> = AnyOf::new(vec![
            Box::new(StepsNum::new(10)),
            Box::new(FitnessBound::new(5.0)),
        ]);

        assert!(!condition.should_stop(&state(3, 1.0, &[])));
        assert!(condition.should_stop(&state(10, 1.0, &[])));
        assert!(condition.should_stop(&state(3, 5.0, &[])));
    }

    #[test]
    fn test_all_of() {
        let condition: AllOf<ListGenome<bool>> = AllOf::new(vec![
            Box::new(StepsNum::new(10)),
            Box::new(FitnessBound::new(5.0)),
        ]);

        assert!(!condition.should_stop(&state(10, 1.0, &[])));
        assert!(!condition.should_stop(&state(3, 5.0, &[])));
        assert!(condition.should_stop(&state(10, 5.0, &[])));
    }

    #[test]
    fn test_empty_all_of_never_stops() {
        let condition: AllOf<ListGenome<bool>> = AllOf::new(vec![]);
        assert!(!condition.should_stop(&state(100, 100.0, &[])));
    }
}
