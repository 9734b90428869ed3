//! Run lifecycle listeners
//!
//! Listeners observe a running algorithm without influencing it. All hooks
//! default to no-ops, so an implementation only overrides what it cares
//! about.

use log::{debug, info};

use crate::genome::Genome;
use crate::stop::RunState;

/// Observer of an algorithm's lifecycle.
///
/// Hooks fire in order: `algorithm_started` once, then
/// `step_started`/`step_finished` around every generation, and
/// `algorithm_finished` once the stop condition holds.
pub trait Listener<G: Genome>: Send + Sync {
    /// The run is initialized and about to enter its loop
    fn algorithm_started(&self, _state: &RunState<G>) {}

    /// A generation is about to be evolved
    fn step_started(&self, _state: &RunState<G>) {}

    /// A generation finished, state reflects the new populations
    fn step_finished(&self, _state: &RunState<G>) {}

    /// The stop condition was met
    fn algorithm_finished(&self, _state: &RunState<G>) {}
}

/// Listener that reports run progress through the `log` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

impl<G: Genome> Listener<G> for LoggingListener {
    fn algorithm_started(&self, state: &RunState<G>) {
        info!(
            "run started with {} population(s), best fitness {}",
            state.populations.len(),
            state.best_fitness
        );
    }

    fn step_finished(&self, state: &RunState<G>) {
        debug!(
            "generation {} finished, best fitness {}",
            state.generation, state.best_fitness
        );
    }

    fn algorithm_finished(&self, state: &RunState<G>) {
        info!(
            "run finished after {} generation(s), best fitness {}",
            state.generation, state.best_fitness
        );
    }
}
