//! The immutable automaton value and its core queries.

use std::collections::VecDeque;
use std::fmt;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};

use crate::alphabet::Alphabet;
use crate::executor::Executor;
use crate::fault::FaultCollection;
use crate::state::State;
use crate::symbol::Symbol;
use crate::transition::{Transition, TransitionTable};

/// A nondeterministic finite automaton with optional epsilon transitions and
/// possibly several initial states.
///
/// The value is immutable once frozen by a builder; every composition
/// algorithm returns a new automaton and never mutates its inputs. Invariants
/// established at construction: every transition endpoint is a declared
/// state, every non-epsilon symbol belongs to the alphabet, the initial and
/// accepting sets are subsets of the state set, and there is at least one
/// initial state (zero accepting states is legal: the empty language).
///
/// Derived results (the epsilon-closure table and the determinacy faults)
/// are computed lazily on first query and memoized per instance in
/// write-once cells. Recomputation would be pure and idempotent, so
/// first-time queries from several threads need no lock. The caches are not
/// part of the automaton's observable equality.
#[derive(Debug, Clone)]
pub struct Automaton<S, A> {
    states: IndexSet<S>,
    alphabet: Alphabet<A>,
    initial_states: IndexSet<S>,
    accepting_states: IndexSet<S>,
    transitions: TransitionTable<S, A>,
    epsilon_closures: OnceLock<IndexMap<S, IndexSet<S>>>,
    determinacy: OnceLock<FaultCollection<S, A>>,
}

impl<S: State, A: Symbol> Automaton<S, A> {
    /// Freeze an automaton from already-validated parts.
    pub(crate) fn from_parts(
        states: IndexSet<S>,
        alphabet: Alphabet<A>,
        initial_states: IndexSet<S>,
        accepting_states: IndexSet<S>,
        transitions: TransitionTable<S, A>,
    ) -> Self {
        debug_assert!(!initial_states.is_empty());
        debug_assert!(initial_states.is_subset(&states));
        debug_assert!(accepting_states.is_subset(&states));
        debug_assert!(transitions.iter().all(|(origin, transition)| {
            states.contains(origin)
                && states.contains(transition.target())
                && transition.symbol().is_none_or(|s| alphabet.contains(s))
        }));
        Self {
            states,
            alphabet,
            initial_states,
            accepting_states,
            transitions,
            epsilon_closures: OnceLock::new(),
            determinacy: OnceLock::new(),
        }
    }

    /// The state set.
    pub fn states(&self) -> &IndexSet<S> {
        &self.states
    }

    /// The alphabet.
    pub fn alphabet(&self) -> &Alphabet<A> {
        &self.alphabet
    }

    /// The initial states.
    pub fn initial_states(&self) -> &IndexSet<S> {
        &self.initial_states
    }

    /// The accepting states.
    pub fn accepting_states(&self) -> &IndexSet<S> {
        &self.accepting_states
    }

    /// The transition table.
    pub fn transitions(&self) -> &TransitionTable<S, A> {
        &self.transitions
    }

    /// The states reachable from `state` via zero or more epsilon
    /// transitions, including `state` itself.
    ///
    /// The closure table for all states is computed on first query and
    /// memoized for the lifetime of this instance.
    ///
    /// # Panics
    ///
    /// If `state` is not part of this automaton (programmer error).
    pub fn epsilon_closure_of(&self, state: &S) -> &IndexSet<S> {
        self.epsilon_closures()
            .get(state)
            .unwrap_or_else(|| panic!("state {state:?} is not part of this automaton"))
    }

    fn epsilon_closures(&self) -> &IndexMap<S, IndexSet<S>> {
        self.epsilon_closures.get_or_init(|| {
            self.states
                .iter()
                .map(|state| (state.clone(), self.epsilon_closure_uncached(state)))
                .collect()
        })
    }

    /// Cycle-safe breadth-first epsilon reachability from one state.
    fn epsilon_closure_uncached(&self, state: &S) -> IndexSet<S> {
        let mut closure = IndexSet::new();
        let mut queue = VecDeque::from([state.clone()]);
        while let Some(current) = queue.pop_front() {
            if !closure.insert(current.clone()) {
                continue;
            }
            for transition in self.transitions.epsilon_transitions_from(&current) {
                if !closure.contains(transition.target()) {
                    queue.push_back(transition.target().clone());
                }
            }
        }
        closure
    }

    /// One logical step: the union, over every state in the epsilon-closure
    /// of `state`, of the epsilon-closures of that state's successors on
    /// `symbol`.
    ///
    /// This is the step determinization, product construction, and the
    /// executor are all built on.
    pub fn reachable_with(&self, state: &S, symbol: &A) -> IndexSet<S> {
        let mut reachable = IndexSet::new();
        for origin in self.epsilon_closure_of(state) {
            for transition in self.transitions.transitions_from_on(origin, symbol) {
                reachable.extend(self.epsilon_closure_of(transition.target()).iter().cloned());
            }
        }
        reachable
    }

    /// Whether the epsilon-closure of `state` contains an accepting state.
    pub(crate) fn closure_accepts(&self, state: &S) -> bool {
        self.epsilon_closure_of(state)
            .iter()
            .any(|reached| self.accepting_states.contains(reached))
    }

    /// The determinacy/totality analysis of this automaton, memoized.
    ///
    /// See [`TransitionTable::check_determinacy`] for the fault inventory.
    pub fn check_determinacy(&self) -> &FaultCollection<S, A> {
        self.determinacy.get_or_init(|| {
            self.transitions
                .check_determinacy(&self.states, &self.alphabet, &self.initial_states)
        })
    }

    /// No determinism faults: no epsilon transitions, at most one destination
    /// per (state, symbol), one initial state.
    pub fn is_deterministic(&self) -> bool {
        !self.check_determinacy().has_determinism_faults()
    }

    /// No totality faults: every (state, symbol) pair has a transition,
    /// irrespective of determinism.
    pub fn is_total(&self) -> bool {
        !self.check_determinacy().has_totality_faults()
    }

    /// The states reachable from any initial state via any transition,
    /// epsilon or symbol.
    pub fn reachable_states(&self) -> IndexSet<S> {
        let mut reachable = IndexSet::new();
        let mut queue: VecDeque<S> = self.initial_states.iter().cloned().collect();
        while let Some(state) = queue.pop_front() {
            if !reachable.insert(state.clone()) {
                continue;
            }
            for transition in self.transitions.transitions_from(&state) {
                if !reachable.contains(transition.target()) {
                    queue.push_back(transition.target().clone());
                }
            }
        }
        reachable
    }

    /// Whether the automaton recognizes the empty language: no reachable
    /// state is accepting.
    pub fn is_empty(&self) -> bool {
        let reachable = self.reachable_states();
        !reachable
            .iter()
            .any(|state| self.accepting_states.contains(state))
    }

    /// Whether the automaton accepts `word`, exploring all nondeterministic
    /// branches in lock-step.
    pub fn accepts(&self, word: &[A]) -> bool {
        Executor::new(self, word.to_vec()).run()
    }

    /// Structural relabeling: a new automaton with every state mapped
    /// through `rename`, which must be injective on this automaton's states.
    pub fn relabel<T: State>(&self, mut rename: impl FnMut(&S) -> T) -> Automaton<T, A> {
        let states: IndexSet<T> = self.states.iter().map(&mut rename).collect();
        debug_assert_eq!(
            states.len(),
            self.states.len(),
            "relabeling must be injective"
        );
        let initial_states = self.initial_states.iter().map(&mut rename).collect();
        let accepting_states = self.accepting_states.iter().map(&mut rename).collect();
        let mut transitions = TransitionTable::new();
        for (origin, transition) in self.transitions.iter() {
            let renamed = match transition.symbol() {
                Some(symbol) => Transition::new(symbol.clone(), rename(transition.target())),
                None => Transition::epsilon(rename(transition.target())),
            };
            transitions.add(rename(origin), renamed);
        }
        Automaton::from_parts(
            states,
            self.alphabet.clone(),
            initial_states,
            accepting_states,
            transitions,
        )
    }

    /// Relabel states to `0..n` in state-set iteration order, the usual way
    /// to flatten the composite states left behind by [`determinize`] and
    /// the product constructions.
    ///
    /// [`determinize`]: Automaton::determinize
    pub fn relabel_numbered(&self) -> Automaton<u32, A> {
        let index: IndexMap<S, u32> = self.states.iter().cloned().zip(0..).collect();
        self.relabel(|state| index[state])
    }
}

impl<S: State, A: Symbol> PartialEq for Automaton<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
            && self.alphabet == other.alphabet
            && self.initial_states == other.initial_states
            && self.accepting_states == other.accepting_states
            && self.transitions == other.transitions
    }
}

impl<S: State, A: Symbol> Eq for Automaton<S, A> {}

impl<S: State, A: Symbol> fmt::Display for Automaton<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} state(s)", self.states.len())?;
        write!(f, "initial:")?;
        for state in &self.initial_states {
            write!(f, " {state:?}")?;
        }
        writeln!(f)?;
        write!(f, "accepting:")?;
        for state in &self.accepting_states {
            write!(f, " {state:?}")?;
        }
        writeln!(f)?;
        writeln!(f, "transitions:")?;
        for (origin, transition) in self.transitions.iter() {
            match transition.symbol() {
                Some(symbol) => {
                    writeln!(f, "  {origin:?} -{symbol:?}-> {:?}", transition.target())?;
                }
                None => writeln!(f, "  {origin:?} -ε-> {:?}", transition.target())?,
            }
        }
        Ok(())
    }
}
