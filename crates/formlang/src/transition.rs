//! Transitions and the transition multimap.

use indexmap::{IndexMap, IndexSet};

use crate::alphabet::Alphabet;
use crate::fault::{Fault, FaultCollection};
use crate::state::State;
use crate::symbol::Symbol;

/// One edge of an automaton: an optional symbol plus a destination state.
///
/// `symbol == None` denotes an epsilon transition, traversable without
/// consuming input. Equality is structural on (symbol, target).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition<S, A> {
    symbol: Option<A>,
    target: S,
}

impl<S: State, A: Symbol> Transition<S, A> {
    /// Create a transition reading `symbol` into `target`.
    pub fn new(symbol: A, target: S) -> Self {
        Self {
            symbol: Some(symbol),
            target,
        }
    }

    /// Create an epsilon transition into `target`.
    pub fn epsilon(target: S) -> Self {
        Self {
            symbol: None,
            target,
        }
    }

    /// The symbol read by this transition, `None` for epsilon.
    pub fn symbol(&self) -> Option<&A> {
        self.symbol.as_ref()
    }

    /// The destination state.
    pub fn target(&self) -> &S {
        &self.target
    }

    /// Check whether this is an epsilon transition.
    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_none()
    }
}

/// A multimap from origin state to its outgoing transitions.
///
/// Invariant: a state with no outgoing transitions is absent from the map,
/// never present with an empty set; removal prunes emptied entries. This is
/// what keeps structural equality stable for automata built incrementally.
/// Adding the same transition twice is a silent no-op (set semantics).
#[derive(Debug, Clone)]
pub struct TransitionTable<S, A> {
    map: IndexMap<S, IndexSet<Transition<S, A>>>,
}

impl<S: State, A: Symbol> TransitionTable<S, A> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    /// Add a transition leaving `origin`.
    pub fn add(&mut self, origin: S, transition: Transition<S, A>) {
        self.map.entry(origin).or_default().insert(transition);
    }

    /// Remove one transition leaving `origin`; returns whether it was present.
    pub fn remove(&mut self, origin: &S, transition: &Transition<S, A>) -> bool {
        let Some(transitions) = self.map.get_mut(origin) else {
            return false;
        };
        let removed = transitions.shift_remove(transition);
        if transitions.is_empty() {
            self.map.shift_remove(origin);
        }
        removed
    }

    /// Remove every transition leaving `origin`.
    pub fn remove_all_from(&mut self, origin: &S) -> bool {
        self.map.shift_remove(origin).is_some()
    }

    /// Remove every transition leaving `origin` that reads `symbol`.
    pub fn remove_from_on(&mut self, origin: &S, symbol: &A) -> bool {
        let Some(transitions) = self.map.get_mut(origin) else {
            return false;
        };
        let before = transitions.len();
        transitions.retain(|transition| transition.symbol() != Some(symbol));
        let removed = transitions.len() != before;
        if transitions.is_empty() {
            self.map.shift_remove(origin);
        }
        removed
    }

    /// Drop all transitions.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// All transitions leaving `origin`, in insertion order.
    pub fn transitions_from(&self, origin: &S) -> impl Iterator<Item = &Transition<S, A>> {
        self.map.get(origin).into_iter().flatten()
    }

    /// Transitions leaving `origin` that read `symbol` (non-epsilon).
    pub fn transitions_from_on<'a>(
        &'a self,
        origin: &S,
        symbol: &'a A,
    ) -> impl Iterator<Item = &'a Transition<S, A>> {
        self.transitions_from(origin)
            .filter(move |transition| transition.symbol() == Some(symbol))
    }

    /// Epsilon transitions leaving `origin`.
    pub fn epsilon_transitions_from(&self, origin: &S) -> impl Iterator<Item = &Transition<S, A>> {
        self.transitions_from(origin)
            .filter(|transition| transition.is_epsilon())
    }

    /// States with at least one outgoing transition, in insertion order.
    pub fn origins(&self) -> impl Iterator<Item = &S> {
        self.map.keys()
    }

    /// All (origin, transition) pairs, grouped by origin in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &Transition<S, A>)> {
        self.map
            .iter()
            .flat_map(|(origin, transitions)| transitions.iter().map(move |t| (origin, t)))
    }

    /// Total number of transitions.
    pub fn len(&self) -> usize {
        self.map.values().map(IndexSet::len).sum()
    }

    /// Check whether the table has no transitions.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Union another table into this one.
    pub fn merge(&mut self, other: TransitionTable<S, A>) {
        for (origin, transitions) in other.map {
            for transition in transitions {
                self.add(origin.clone(), transition);
            }
        }
    }

    /// Run the determinacy/totality analysis for an automaton with the given
    /// state set, alphabet, and initial states.
    ///
    /// Determinism faults: one [`Fault::AmbiguousTransition`] with
    /// `symbol = None` per state with epsilon transitions (listing all epsilon
    /// targets in table order), one per (state, symbol) pair with two or more
    /// destinations, and [`Fault::MultipleInitialStates`] reported once.
    /// Totality faults: one [`Fault::MissingTransition`] per (state, symbol)
    /// pair with no destination. States and symbols are visited in insertion
    /// order, so the fault sequence is reproducible.
    pub fn check_determinacy(
        &self,
        states: &IndexSet<S>,
        alphabet: &Alphabet<A>,
        initial_states: &IndexSet<S>,
    ) -> FaultCollection<S, A> {
        let mut faults = FaultCollection::new();
        if initial_states.len() > 1 {
            faults.push(Fault::MultipleInitialStates);
        }
        for state in states {
            let epsilon_targets: Vec<S> = self
                .epsilon_transitions_from(state)
                .map(|transition| transition.target().clone())
                .collect();
            if !epsilon_targets.is_empty() {
                faults.push(Fault::AmbiguousTransition {
                    state: state.clone(),
                    symbol: None,
                    targets: epsilon_targets,
                });
            }
            for symbol in alphabet.iter() {
                let targets: Vec<S> = self
                    .transitions_from_on(state, symbol)
                    .map(|transition| transition.target().clone())
                    .collect();
                match targets.len() {
                    0 => faults.push(Fault::MissingTransition {
                        state: state.clone(),
                        symbol: symbol.clone(),
                    }),
                    1 => {}
                    _ => faults.push(Fault::AmbiguousTransition {
                        state: state.clone(),
                        symbol: Some(symbol.clone()),
                        targets,
                    }),
                }
            }
        }
        faults
    }
}

impl<S: State, A: Symbol> Default for TransitionTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Symbol> PartialEq for TransitionTable<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<S: State, A: Symbol> Eq for TransitionTable<S, A> {}
