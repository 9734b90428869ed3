//! Genetic algorithm driver
//!
//! This module implements the generational driver that owns the evolving
//! populations, runs the step pipeline until a stop condition holds and
//! records the best individual of every generation.

use std::sync::Arc;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithms::listener::Listener;
use crate::error::{EvoResult, EvolutionError};
use crate::evolver::Evolver;
use crate::genome::Genome;
use crate::operators::catastrophe::NoCatastrophe;
use crate::operators::traits::{Catastrophe, Mutation, Recombination, Replacement, Selection};
use crate::population::{Individual, Population, Spawner};
use crate::stop::{RunState, StepsNum, StopCondition};

/// Recipe for one population owned by the driver.
///
/// Several specs make the driver evolve several lineages side by side,
/// each stepping once per generation.
pub struct PopulationSpec<G: Genome> {
    size: usize,
    spawner: Spawner<G>,
    seeds: Vec<Individual<G>>,
}

impl<G: Genome> PopulationSpec<G> {
    /// Spec for a population of `size` spawned individuals
    pub fn new(size: usize, spawner: Spawner<G>) -> Self {
        Self {
            size,
            spawner,
            seeds: Vec::new(),
        }
    }

    /// Start the population from these individuals instead of spawning all
    pub fn with_seeds(mut self, seeds: Vec<Individual<G>>) -> Self {
        self.seeds = seeds;
        self
    }
}

impl<G: Genome> Clone for PopulationSpec<G> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            spawner: self.spawner.clone(),
            seeds: self.seeds.clone(),
        }
    }
}

/// Builder for [`GeneticAlgorithm`].
///
/// Operators are tracked in the type parameters, so `build` is only
/// callable once selection, recombination, mutation, replacement and a
/// stop condition have all been provided.
pub struct GeneticAlgorithmBuilder<G, S, X, M, P, C, T>
where
    G: Genome,
{
    populations: Vec<PopulationSpec<G>>,
    selection: Option<S>,
    recombination: Option<X>,
    mutation: Option<M>,
    replacement: Option<P>,
    catastrophe: C,
    stop: Option<T>,
    replacement_rate: f64,
    p_recombination: f64,
    p_mutation: f64,
    seed: Option<u64>,
    listeners: Vec<Arc<dyn Listener<G>>>,
    parallel: bool,
}

impl<G: Genome> GeneticAlgorithmBuilder<G, (), (), (), (), NoCatastrophe, ()> {
    /// Create a builder with default rates and no operators
    pub fn new() -> Self {
        Self {
            populations: Vec::new(),
            selection: None,
            recombination: None,
            mutation: None,
            replacement: None,
            catastrophe: NoCatastrophe,
            stop: None,
            replacement_rate: 1.0,
            p_recombination: 0.9,
            p_mutation: 0.1,
            seed: None,
            listeners: Vec::new(),
            parallel: false,
        }
    }
}

impl<G: Genome> Default for GeneticAlgorithmBuilder<G, (), (), (), (), NoCatastrophe, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, S, X, M, P, C, T> GeneticAlgorithmBuilder<G, S, X, M, P, C, T>
where
    G: Genome,
{
    /// Add a population spec; may be called several times
    pub fn population(mut self, spec: PopulationSpec<G>) -> Self {
        self.populations.push(spec);
        self
    }

    /// Fraction of each population replaced per generation, in `(0, 1]`
    pub fn replacement_rate(mut self, rate: f64) -> Self {
        self.replacement_rate = rate;
        self
    }

    /// Probability that selected parents recombine
    pub fn recombination_probability(mut self, p: f64) -> Self {
        self.p_recombination = p;
        self
    }

    /// Probability that each offspring mutates
    pub fn mutation_probability(mut self, p: f64) -> Self {
        self.p_mutation = p;
        self
    }

    /// Seed the driver's random generator for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Register a lifecycle listener
    pub fn listener(mut self, listener: Arc<dyn Listener<G>>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Step populations with the chunked parallel pipeline
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the selection operator
    pub fn selection<NewS>(
        self,
        selection: NewS,
    ) -> GeneticAlgorithmBuilder<G, NewS, X, M, P, C, T>
    where
        NewS: Selection<G>,
    {
        GeneticAlgorithmBuilder {
            populations: self.populations,
            selection: Some(selection),
            recombination: self.recombination,
            mutation: self.mutation,
            replacement: self.replacement,
            catastrophe: self.catastrophe,
            stop: self.stop,
            replacement_rate: self.replacement_rate,
            p_recombination: self.p_recombination,
            p_mutation: self.p_mutation,
            seed: self.seed,
            listeners: self.listeners,
            parallel: self.parallel,
        }
    }

    /// Set the recombination operator
    pub fn recombination<NewX>(
        self,
        recombination: NewX,
    ) -> GeneticAlgorithmBuilder<G, S, NewX, M, P, C, T>
    where
        NewX: Recombination<G>,
    {
        GeneticAlgorithmBuilder {
            populations: self.populations,
            selection: self.selection,
            recombination: Some(recombination),
            mutation: self.mutation,
            replacement: self.replacement,
            catastrophe: self.catastrophe,
            stop: self.stop,
            replacement_rate: self.replacement_rate,
            p_recombination: self.p_recombination,
            p_mutation: self.p_mutation,
            seed: self.seed,
            listeners: self.listeners,
            parallel: self.parallel,
        }
    }

    /// Set the mutation operator
    pub fn mutation<NewM>(
        self,
        mutation: NewM,
    ) -> GeneticAlgorithmBuilder<G, S, X, NewM, P, C, T>
    where
        NewM: Mutation<G>,
    {
        GeneticAlgorithmBuilder {
            populations: self.populations,
            selection: self.selection,
            recombination: self.recombination,
            mutation: Some(mutation),
            replacement: self.replacement,
            catastrophe: self.catastrophe,
            stop: self.stop,
            replacement_rate: self.replacement_rate,
            p_recombination: self.p_recombination,
            p_mutation: self.p_mutation,
            seed: self.seed,
            listeners: self.listeners,
            parallel: self.parallel,
        }
    }

    /// Set the replacement operator
    pub fn replacement<NewP>(
        self,
        replacement: NewP,
    ) -> GeneticAlgorithmBuilder<G, S, X, M, NewP, C, T>
    where
        NewP: Replacement<G>,
    {
        GeneticAlgorithmBuilder {
            populations: self.populations,
            selection: self.selection,
            recombination: self.recombination,
            mutation: self.mutation,
            replacement: Some(replacement),
            catastrophe: self.catastrophe,
            stop: self.stop,
            replacement_rate: self.replacement_rate,
            p_recombination: self.p_recombination,
            p_mutation: self.p_mutation,
            seed: self.seed,
            listeners: self.listeners,
            parallel: self.parallel,
        }
    }

    /// Set the catastrophe operator (defaults to none)
    pub fn catastrophe<NewC>(
        self,
        catastrophe: NewC,
    ) -> GeneticAlgorithmBuilder<G, S, X, M, P, NewC, T>
    where
        NewC: Catastrophe<G>,
    {
        GeneticAlgorithmBuilder {
            populations: self.populations,
            selection: self.selection,
            recombination: self.recombination,
            mutation: self.mutation,
            replacement: self.replacement,
            catastrophe,
            stop: self.stop,
            replacement_rate: self.replacement_rate,
            p_recombination: self.p_recombination,
            p_mutation: self.p_mutation,
            seed: self.seed,
            listeners: self.listeners,
            parallel: self.parallel,
        }
    }

    /// Set the stop condition
    pub fn stop<NewT>(self, stop: NewT) -> GeneticAlgorithmBuilder<G, S, X, M, P, C, NewT>
    where
        NewT: StopCondition<G>,
    {
        GeneticAlgorithmBuilder {
            populations: self.populations,
            selection: self.selection,
            recombination: self.recombination,
            mutation: self.mutation,
            replacement: self.replacement,
            catastrophe: self.catastrophe,
            stop: Some(stop),
            replacement_rate: self.replacement_rate,
            p_recombination: self.p_recombination,
            p_mutation: self.p_mutation,
            seed: self.seed,
            listeners: self.listeners,
            parallel: self.parallel,
        }
    }

    /// Stop after a fixed number of generations (convenience method)
    pub fn steps(self, steps: usize) -> GeneticAlgorithmBuilder<G, S, X, M, P, C, StepsNum> {
        self.stop(StepsNum::new(steps))
    }
}

impl<G, S, X, M, P, C, T> GeneticAlgorithmBuilder<G, S, X, M, P, C, T>
where
    G: Genome,
    S: Selection<G>,
    X: Recombination<G>,
    M: Mutation<G>,
    P: Replacement<G>,
    C: Catastrophe<G>,
    T: StopCondition<G>,
{
    /// Build the driver instance
    #[allow(clippy::type_complexity)]
    pub fn build(self) -> EvoResult<GeneticAlgorithm<G, S, X, M, P, C, T>> {
        if self.populations.is_empty() {
            return Err(EvolutionError::Configuration(
                "at least one population must be specified".to_string(),
            ));
        }

        let selection = self.selection.ok_or_else(|| {
            EvolutionError::Configuration("selection operator must be specified".to_string())
        })?;
        let recombination = self.recombination.ok_or_else(|| {
            EvolutionError::Configuration("recombination operator must be specified".to_string())
        })?;
        let mutation = self.mutation.ok_or_else(|| {
            EvolutionError::Configuration("mutation operator must be specified".to_string())
        })?;
        let replacement = self.replacement.ok_or_else(|| {
            EvolutionError::Configuration("replacement operator must be specified".to_string())
        })?;
        let stop = self.stop.ok_or_else(|| {
            EvolutionError::Configuration("stop condition must be specified".to_string())
        })?;

        let evolver = Evolver::new(
            selection,
            recombination,
            mutation,
            replacement,
            self.replacement_rate,
            self.p_recombination,
            self.p_mutation,
        )?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(GeneticAlgorithm {
            evolver,
            catastrophe: self.catastrophe,
            stop,
            specs: self.populations,
            populations: Vec::new(),
            listeners: self.listeners,
            history: Vec::new(),
            fitness_history: Vec::new(),
            generation: 0,
            rng,
            parallel: self.parallel,
        })
    }
}

/// Generational genetic algorithm driver.
///
/// Owns one or more populations and a bundle of operators. Every call to
/// [`step`](GeneticAlgorithm::step) evolves all populations one
/// generation and extends the best-individual history;
/// [`run`](GeneticAlgorithm::run) loops until the stop condition holds,
/// firing listener hooks along the way.
pub struct GeneticAlgorithm<G, S, X, M, P, C, T>
where
    G: Genome,
{
    evolver: Evolver<S, X, M, P>,
    catastrophe: C,
    stop: T,
    specs: Vec<PopulationSpec<G>>,
    populations: Vec<Population<G>>,
    listeners: Vec<Arc<dyn Listener<G>>>,
    history: Vec<Individual<G>>,
    fitness_history: Vec<f64>,
    generation: usize,
    rng: StdRng,
    parallel: bool,
}

impl<G, S, X, M, P, C, T> GeneticAlgorithm<G, S, X, M, P, C, T>
where
    G: Genome,
    S: Selection<G>,
    X: Recombination<G>,
    M: Mutation<G>,
    P: Replacement<G>,
    C: Catastrophe<G>,
    T: StopCondition<G>,
{
    /// Create a builder for the driver
    pub fn builder() -> GeneticAlgorithmBuilder<G, (), (), (), (), NoCatastrophe, ()> {
        GeneticAlgorithmBuilder::new()
    }

    /// Completed generations so far
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The evolving populations (empty before initialization)
    pub fn populations(&self) -> &[Population<G>] {
        &self.populations
    }

    /// Best fitness per generation, cumulative
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    /// Why the stop condition would report the run as finished
    pub fn stop_reason(&self) -> &'static str {
        self.stop.reason()
    }

    /// The best individual seen up to `generation`, or overall for `None`.
    ///
    /// Errors with [`EvolutionError::HistoryOutOfRange`] if that
    /// generation has not been recorded.
    pub fn best(&self, generation: Option<usize>) -> EvoResult<&Individual<G>> {
        let requested = generation.unwrap_or_else(|| self.history.len().saturating_sub(1));
        self.history
            .get(requested)
            .ok_or(EvolutionError::HistoryOutOfRange {
                requested,
                recorded: self.history.len(),
            })
    }

    /// (Re)build the populations from their specs.
    ///
    /// Evaluates every spawned individual once in initialization mode,
    /// then records the initial best as generation zero of the history.
    pub fn initialize(&mut self) -> EvoResult<()> {
        self.populations.clear();
        self.history.clear();
        self.fitness_history.clear();
        self.generation = 0;

        for spec in &self.specs {
            let population = Population::with_seeds(
                spec.size,
                spec.spawner.clone(),
                spec.seeds.clone(),
                &mut self.rng,
            )?;
            population.evaluate_init()?;
            self.populations.push(population);
        }
        debug!("initialized {} population(s)", self.populations.len());

        let (best, fitness) = self.overall_best()?;
        self.history.push(best);
        self.fitness_history.push(fitness);
        Ok(())
    }

    /// Evolve all populations one generation.
    ///
    /// Initializes first if needed. The history gains one entry holding
    /// the best individual seen so far.
    pub fn step(&mut self) -> EvoResult<()> {
        if self.populations.is_empty() {
            self.initialize()?;
        }
        self.notify(|listener, state| listener.step_started(state));

        for population in &mut self.populations {
            #[cfg(feature = "parallel")]
            {
                if self.parallel {
                    self.evolver.step_parallel(population, &mut self.rng)?;
                } else {
                    self.evolver.step(population, &mut self.rng)?;
                }
            }
            #[cfg(not(feature = "parallel"))]
            {
                if self.parallel {
                    trace!("parallel stepping requested but the feature is disabled");
                }
                self.evolver.step(population, &mut self.rng)?;
            }
            self.catastrophe.apply(population, &mut self.rng)?;
        }
        self.generation += 1;

        let (generation_best, generation_fitness) = self.overall_best()?;
        let (entry, fitness) = match (self.history.last(), self.fitness_history.last()) {
            (Some(previous), Some(&previous_fitness))
                if previous_fitness >= generation_fitness =>
            {
                (previous.snapshot(), previous_fitness)
            }
            _ => (generation_best, generation_fitness),
        };
        trace!("generation {} best fitness {fitness}", self.generation);
        self.history.push(entry);
        self.fitness_history.push(fitness);

        self.notify(|listener, state| listener.step_finished(state));
        Ok(())
    }

    /// Run until the stop condition holds, returning the best individual.
    pub fn run(&mut self) -> EvoResult<Individual<G>> {
        self.initialize()?;
        self.notify(|listener, state| listener.algorithm_started(state));

        while !self.stop.should_stop(&self.state()) {
            self.step()?;
        }

        self.notify(|listener, state| listener.algorithm_finished(state));
        self.best(None).map(Individual::snapshot)
    }

    fn state(&self) -> RunState<'_, G> {
        RunState {
            generation: self.generation,
            best_fitness: self
                .fitness_history
                .last()
                .copied()
                .unwrap_or(f64::NEG_INFINITY),
            populations: &self.populations,
            fitness_history: &self.fitness_history,
        }
    }

    fn notify(&self, hook: impl Fn(&dyn Listener<G>, &RunState<G>)) {
        let state = self.state();
        for listener in &self.listeners {
            hook(listener.as_ref(), &state);
        }
    }

    /// Best individual across all populations, with its fitness
    fn overall_best(&mut self) -> EvoResult<(Individual<G>, f64)> {
        let mut best: Option<(Individual<G>, f64)> = None;
        for population in &mut self.populations {
            let mut snapshot = population.best()?.snapshot();
            let fitness = snapshot.fitness()?;
            let better = match &best {
                Some((_, current)) => fitness > *current,
                None => true,
            };
            if better {
                best = Some((snapshot, fitness));
            }
        }
        best.ok_or(EvolutionError::EmptyPopulation)
    }
}

impl<G, S, X, M, P, C, T> Clone for GeneticAlgorithm<G, S, X, M, P, C, T>
where
    G: Genome,
    S: Clone,
    X: Clone,
    M: Clone,
    P: Clone,
    C: Clone,
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            evolver: self.evolver.clone(),
            catastrophe: self.catastrophe.clone(),
            stop: self.stop.clone(),
            specs: self.specs.clone(),
            populations: self.populations.clone(),
            listeners: self.listeners.clone(),
            // snapshots keep the memoized fitness values intact
            history: self.history.iter().map(Individual::snapshot).collect(),
            fitness_history: self.fitness_history.clone(),
            generation: self.generation,
            rng: self.rng.clone(),
            parallel: self.parallel,
        }
    }
}
