//! Synchronous lock-step execution of all nondeterministic branches.

use indexmap::IndexSet;

use crate::automaton::Automaton;
use crate::state::State;
use crate::symbol::Symbol;

/// A snapshot of one execution branch: a state plus the input position the
/// branch has consumed up to. A configuration is *halting* once its position
/// equals the input length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration<S> {
    state: S,
    position: usize,
}

impl<S: State> Configuration<S> {
    fn new(state: S, position: usize) -> Self {
        Self { state, position }
    }

    /// The branch's current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// How many input symbols the branch has consumed.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Drives an automaton over one input word, exploring every nondeterministic
/// branch in lock-step without ever determinizing.
///
/// The executor holds a *set* of configurations. Seeding takes the
/// epsilon-closure of every initial state at position 0, and every step folds
/// the epsilon-closure of each successor in, so the configuration set is
/// epsilon-closed at all times and epsilon moves never cost a visible step.
/// The run is accepted iff, after fully consuming the input, at least one
/// configuration is both halting and accepting; an emptied configuration set
/// means no branch matched and the run is rejected.
#[derive(Debug)]
pub struct Executor<'a, S, A> {
    automaton: &'a Automaton<S, A>,
    word: Vec<A>,
    configurations: IndexSet<Configuration<S>>,
}

impl<'a, S: State, A: Symbol> Executor<'a, S, A> {
    /// Seed an execution of `automaton` over `word`.
    pub fn new(automaton: &'a Automaton<S, A>, word: Vec<A>) -> Self {
        let configurations = automaton
            .initial_states()
            .iter()
            .flat_map(|initial| automaton.epsilon_closure_of(initial).iter().cloned())
            .map(|state| Configuration::new(state, 0))
            .collect();
        Self {
            automaton,
            word,
            configurations,
        }
    }

    /// The input word.
    pub fn word(&self) -> &[A] {
        &self.word
    }

    /// The current configuration set.
    pub fn configurations(&self) -> &IndexSet<Configuration<S>> {
        &self.configurations
    }

    /// Whether `configuration` has consumed the whole input.
    pub fn is_halting(&self, configuration: &Configuration<S>) -> bool {
        configuration.position == self.word.len()
    }

    /// Whether no further step can change the outcome: every surviving
    /// branch is halting, or no branch survived at all.
    pub fn finished(&self) -> bool {
        self.configurations
            .iter()
            .all(|configuration| self.is_halting(configuration))
    }

    /// Advance every non-halting configuration over its current input
    /// symbol, firing all applicable transitions and folding in the
    /// epsilon-closure of every resulting state. A no-op once finished.
    pub fn next_step(&mut self) {
        if self.finished() {
            return;
        }
        let mut next = IndexSet::new();
        for configuration in &self.configurations {
            if self.is_halting(configuration) {
                next.insert(configuration.clone());
                continue;
            }
            let symbol = &self.word[configuration.position];
            for successor in self.automaton.reachable_with(configuration.state(), symbol) {
                next.insert(Configuration::new(successor, configuration.position + 1));
            }
        }
        self.configurations = next;
    }

    /// Whether some halting configuration sits on an accepting state.
    pub fn accepted(&self) -> bool {
        self.configurations.iter().any(|configuration| {
            self.is_halting(configuration)
                && self
                    .automaton
                    .accepting_states()
                    .contains(configuration.state())
        })
    }

    /// Run to completion and report acceptance.
    pub fn run(&mut self) -> bool {
        while !self.finished() {
            self.next_step();
        }
        self.accepted()
    }
}
