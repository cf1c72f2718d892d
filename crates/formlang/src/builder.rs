//! Fault-reporting construction of automata.

use indexmap::IndexSet;

use crate::alphabet::Alphabet;
use crate::automaton::Automaton;
use crate::fault::{Fault, FaultCategory, FaultCollection};
use crate::state::State;
use crate::symbol::Symbol;
use crate::transition::{Transition, TransitionTable};

/// Mutable accumulator of states, initial states, accepting states, and
/// transitions, frozen into an immutable [`Automaton`] by [`build`].
///
/// Every mutator returns `&mut Self` for chaining, and accumulation is
/// monotonic: `with_*` calls only add, `override_*` calls clear exactly one
/// set before adding. Validation is syntactic only and performs no mutation;
/// [`build`] either freezes a deep copy of the current sets or returns the
/// [`FaultCollection`], never both. Builders are not meant to be shared
/// across threads while being mutated.
///
/// [`build`]: AutomatonBuilder::build
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<S, A> {
    states: IndexSet<S>,
    alphabet: Alphabet<A>,
    initial_states: IndexSet<S>,
    accepting_states: IndexSet<S>,
    transitions: TransitionTable<S, A>,
}

impl<S: State, A: Symbol> AutomatonBuilder<S, A> {
    /// Create an empty builder over `alphabet`.
    ///
    /// The alphabet is fixed for the lifetime of the builder and survives
    /// [`build_and_reset`](Self::build_and_reset).
    pub fn new(alphabet: Alphabet<A>) -> Self {
        Self {
            states: IndexSet::new(),
            alphabet,
            initial_states: IndexSet::new(),
            accepting_states: IndexSet::new(),
            transitions: TransitionTable::new(),
        }
    }

    /// Create a builder pre-loaded with a copy of every component of
    /// `automaton`, for non-destructive derivation. The builder keeps no
    /// reference back to the source.
    pub fn from_automaton(automaton: &Automaton<S, A>) -> Self {
        Self {
            states: automaton.states().clone(),
            alphabet: automaton.alphabet().clone(),
            initial_states: automaton.initial_states().clone(),
            accepting_states: automaton.accepting_states().clone(),
            transitions: automaton.transitions().clone(),
        }
    }

    /// Declare states.
    pub fn with_states<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.states.extend(states);
        self
    }

    /// Declare states as initial (adds to the state set as well).
    pub fn with_initial<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        for state in states {
            self.states.insert(state.clone());
            self.initial_states.insert(state);
        }
        self
    }

    /// Declare states as accepting (adds to the state set as well).
    pub fn with_accepting<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        for state in states {
            self.states.insert(state.clone());
            self.accepting_states.insert(state);
        }
        self
    }

    /// Clear the initial set, then declare `states` as initial.
    pub fn override_initial<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.initial_states.clear();
        self.with_initial(states)
    }

    /// Clear the accepting set, then declare `states` as accepting.
    pub fn override_accepting<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.accepting_states.clear();
        self.with_accepting(states)
    }

    /// Add a transition reading `symbol` from `origin` into `target`.
    ///
    /// Neither end is implicitly declared: dangling references are reported
    /// by [`validate`](Self::validate), not repaired.
    pub fn with_transition(&mut self, origin: S, symbol: A, target: S) -> &mut Self {
        self.transitions.add(origin, Transition::new(symbol, target));
        self
    }

    /// Add an epsilon transition from `origin` into `target`.
    pub fn with_epsilon_transition(&mut self, origin: S, target: S) -> &mut Self {
        self.transitions.add(origin, Transition::epsilon(target));
        self
    }

    /// Remove every transition leaving `origin`.
    pub fn remove_transitions(&mut self, origin: &S) -> &mut Self {
        self.transitions.remove_all_from(origin);
        self
    }

    /// Remove every transition leaving `origin` that reads `symbol`.
    pub fn remove_transitions_on(&mut self, origin: &S, symbol: &A) -> &mut Self {
        self.transitions.remove_from_on(origin, symbol);
        self
    }

    /// Remove all transitions.
    pub fn clear_transitions(&mut self) -> &mut Self {
        self.transitions.clear();
        self
    }

    /// Union other builders into this one: states, accepting states, and
    /// transitions are always merged; initial states only when
    /// `merge_initial_states` is set. Composition algorithms assembling a
    /// larger automaton from sub-automata use the flag to control exactly
    /// when several initial states may appear.
    pub fn merge_with<I>(&mut self, merge_initial_states: bool, others: I) -> &mut Self
    where
        I: IntoIterator<Item = AutomatonBuilder<S, A>>,
    {
        for other in others {
            self.alphabet.extend(other.alphabet.iter().cloned());
            self.states.extend(other.states);
            self.accepting_states.extend(other.accepting_states);
            if merge_initial_states {
                self.initial_states.extend(other.initial_states);
            }
            self.transitions.merge(other.transitions);
        }
        self
    }

    /// Check whether `state` has been declared.
    pub fn has_state(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// The builder's alphabet.
    pub fn alphabet(&self) -> &Alphabet<A> {
        &self.alphabet
    }

    /// The declared states.
    pub fn states(&self) -> &IndexSet<S> {
        &self.states
    }

    /// The declared initial states.
    pub fn initial_states(&self) -> &IndexSet<S> {
        &self.initial_states
    }

    /// The declared accepting states.
    pub fn accepting_states(&self) -> &IndexSet<S> {
        &self.accepting_states
    }

    /// The accumulated transitions.
    pub fn transitions(&self) -> &TransitionTable<S, A> {
        &self.transitions
    }

    /// Syntax-only validation, independent of semantics.
    ///
    /// Reports a missing-initial-state fault for an empty initial set, and
    /// for every transition an unknown-origin, unknown-symbol, and
    /// unknown-destination fault as applicable; all three can fire for one
    /// transition. Zero accepting states is not a fault: such an automaton
    /// recognizes the empty language.
    pub fn validate(&self) -> FaultCollection<S, A> {
        let mut faults = FaultCollection::new();
        if self.initial_states.is_empty() {
            faults.push(Fault::MissingInitialState);
        }
        for (origin, transition) in self.transitions.iter() {
            if !self.states.contains(origin) {
                faults.push(Fault::UnknownOrigin {
                    origin: origin.clone(),
                    transition: transition.clone(),
                });
            }
            if let Some(symbol) = transition.symbol() {
                if !self.alphabet.contains(symbol) {
                    faults.push(Fault::UnknownSymbol {
                        origin: origin.clone(),
                        transition: transition.clone(),
                    });
                }
            }
            if !self.states.contains(transition.target()) {
                faults.push(Fault::UnknownTarget {
                    origin: origin.clone(),
                    transition: transition.clone(),
                });
            }
        }
        faults
    }

    /// Validate and freeze an [`Automaton`] from a copy of the current sets;
    /// later builder mutation cannot affect the returned automaton.
    pub fn build(&self) -> Result<Automaton<S, A>, FaultCollection<S, A>> {
        let faults = self.validate();
        if !faults.is_empty() {
            return Err(faults);
        }
        Ok(Automaton::from_parts(
            self.states.clone(),
            self.alphabet.clone(),
            self.initial_states.clone(),
            self.accepting_states.clone(),
            self.transitions.clone(),
        ))
    }

    /// [`build`](Self::build), then clear the state/initial/accepting/
    /// transition sets for reuse. The alphabet is retained.
    pub fn build_and_reset(&mut self) -> Result<Automaton<S, A>, FaultCollection<S, A>> {
        let result = self.build();
        self.reset();
        result
    }

    /// Clear everything except the alphabet.
    pub fn reset(&mut self) {
        self.states.clear();
        self.initial_states.clear();
        self.accepting_states.clear();
        self.transitions.clear();
    }
}

/// An [`AutomatonBuilder`] for deterministic automata.
///
/// On top of the syntactic checks, validation runs the determinacy/totality
/// analysis on the accumulated transitions and folds its faults into the
/// result: determinism faults (ambiguity, epsilon transitions, several
/// initial states) always, totality faults only while ensure-totality is on
/// (the default). Turning it off makes this a "must be deterministic"
/// builder that tolerates an incomplete transition function.
#[derive(Debug, Clone)]
pub struct DfaBuilder<S, A> {
    inner: AutomatonBuilder<S, A>,
    ensure_totality: bool,
}

impl<S: State, A: Symbol> DfaBuilder<S, A> {
    /// Create an empty builder over `alphabet`, with ensure-totality on.
    pub fn new(alphabet: Alphabet<A>) -> Self {
        Self {
            inner: AutomatonBuilder::new(alphabet),
            ensure_totality: true,
        }
    }

    /// Toggle the totality requirement.
    pub fn ensure_totality(&mut self, ensure: bool) -> &mut Self {
        self.ensure_totality = ensure;
        self
    }

    /// See [`AutomatonBuilder::with_states`].
    pub fn with_states<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.inner.with_states(states);
        self
    }

    /// See [`AutomatonBuilder::with_initial`].
    pub fn with_initial<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.inner.with_initial(states);
        self
    }

    /// See [`AutomatonBuilder::with_accepting`].
    pub fn with_accepting<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.inner.with_accepting(states);
        self
    }

    /// See [`AutomatonBuilder::override_initial`].
    pub fn override_initial<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.inner.override_initial(states);
        self
    }

    /// See [`AutomatonBuilder::override_accepting`].
    pub fn override_accepting<I: IntoIterator<Item = S>>(&mut self, states: I) -> &mut Self {
        self.inner.override_accepting(states);
        self
    }

    /// See [`AutomatonBuilder::with_transition`].
    pub fn with_transition(&mut self, origin: S, symbol: A, target: S) -> &mut Self {
        self.inner.with_transition(origin, symbol, target);
        self
    }

    /// See [`AutomatonBuilder::with_epsilon_transition`]. Epsilon transitions
    /// are always reported as determinism faults by [`validate`](Self::validate).
    pub fn with_epsilon_transition(&mut self, origin: S, target: S) -> &mut Self {
        self.inner.with_epsilon_transition(origin, target);
        self
    }

    /// See [`AutomatonBuilder::remove_transitions`].
    pub fn remove_transitions(&mut self, origin: &S) -> &mut Self {
        self.inner.remove_transitions(origin);
        self
    }

    /// See [`AutomatonBuilder::remove_transitions_on`].
    pub fn remove_transitions_on(&mut self, origin: &S, symbol: &A) -> &mut Self {
        self.inner.remove_transitions_on(origin, symbol);
        self
    }

    /// See [`AutomatonBuilder::clear_transitions`].
    pub fn clear_transitions(&mut self) -> &mut Self {
        self.inner.clear_transitions();
        self
    }

    /// See [`AutomatonBuilder::has_state`].
    pub fn has_state(&self, state: &S) -> bool {
        self.inner.has_state(state)
    }

    /// Read access to the accumulated sets.
    pub fn as_builder(&self) -> &AutomatonBuilder<S, A> {
        &self.inner
    }

    /// Syntactic validation plus the determinacy/totality analysis.
    pub fn validate(&self) -> FaultCollection<S, A> {
        let mut faults = self.inner.validate();
        let analysis = self.inner.transitions.check_determinacy(
            &self.inner.states,
            &self.inner.alphabet,
            &self.inner.initial_states,
        );
        for fault in analysis {
            match fault.category() {
                FaultCategory::Determinism => faults.push(fault),
                FaultCategory::Totality if self.ensure_totality => faults.push(fault),
                _ => {}
            }
        }
        faults
    }

    /// Validate and freeze, as [`AutomatonBuilder::build`].
    pub fn build(&self) -> Result<Automaton<S, A>, FaultCollection<S, A>> {
        let faults = self.validate();
        if !faults.is_empty() {
            return Err(faults);
        }
        self.inner.build()
    }

    /// [`build`](Self::build), then reset all but the alphabet.
    pub fn build_and_reset(&mut self) -> Result<Automaton<S, A>, FaultCollection<S, A>> {
        let result = self.build();
        self.inner.reset();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultKind;

    fn alphabet() -> Alphabet<char> {
        Alphabet::from_iter(['a', 'b'])
    }

    #[test]
    fn test_build_simple_nfa() {
        // 0 -a-> 1(accepting), 0 -ε-> 1
        let mut builder = AutomatonBuilder::new(alphabet());
        builder
            .with_initial([0u32])
            .with_accepting([1])
            .with_transition(0, 'a', 1)
            .with_epsilon_transition(0, 1);

        let automaton = builder.build().expect("valid automaton");
        assert_eq!(automaton.states().len(), 2);
        assert_eq!(automaton.transitions().len(), 2);
    }

    #[test]
    fn test_missing_initial_state_fault() {
        let builder: AutomatonBuilder<u32, char> = AutomatonBuilder::new(alphabet());
        let faults = builder.build().unwrap_err();
        assert_eq!(faults.len(), 1);
        assert!(faults.contains(&Fault::MissingInitialState));
    }

    #[test]
    fn test_dangling_transition_faults_fire_independently() {
        // one transition whose origin, symbol, and target are all undeclared
        let mut builder = AutomatonBuilder::new(alphabet());
        builder.with_initial([0u32]).with_transition(7, 'z', 8);

        let faults = builder.validate();
        assert_eq!(faults.len(), 3);
        assert!(faults.contains_kind(FaultKind::UnknownOrigin));
        assert!(faults.contains_kind(FaultKind::UnknownSymbol));
        assert!(faults.contains_kind(FaultKind::UnknownTarget));
    }

    #[test]
    fn test_no_accepting_states_is_not_a_fault() {
        let mut builder = AutomatonBuilder::new(alphabet());
        builder.with_initial([0u32]);

        let automaton = builder.build().expect("empty language is legal");
        assert!(automaton.accepting_states().is_empty());
        assert!(automaton.is_empty());
    }

    #[test]
    fn test_override_clears_one_set_only() {
        let mut builder = AutomatonBuilder::new(alphabet());
        builder
            .with_initial([0u32])
            .with_accepting([1])
            .override_initial([2])
            .override_accepting([3]);

        assert_eq!(builder.initial_states().len(), 1);
        assert!(builder.initial_states().contains(&2));
        assert!(builder.accepting_states().contains(&3));
        // previously declared states stay declared
        assert!(builder.has_state(&0));
        assert!(builder.has_state(&1));
    }

    #[test]
    fn test_build_and_reset_retains_alphabet() {
        let mut builder = AutomatonBuilder::new(alphabet());
        builder
            .with_initial([0u32])
            .with_accepting([1])
            .with_transition(0, 'a', 1);

        builder.build_and_reset().expect("valid automaton");

        assert!(builder.states().is_empty());
        assert!(builder.initial_states().is_empty());
        assert!(builder.accepting_states().is_empty());
        assert!(builder.transitions().is_empty());
        assert_eq!(builder.alphabet(), &alphabet());

        // untouched builder now lacks an initial state
        let faults = builder.build().unwrap_err();
        assert!(faults.contains(&Fault::MissingInitialState));
    }

    #[test]
    fn test_built_automaton_is_detached_from_builder() {
        let mut builder = AutomatonBuilder::new(alphabet());
        builder.with_initial([0u32]).with_transition(0, 'a', 0);
        let automaton = builder.build().expect("valid automaton");

        builder.with_accepting([5]).with_transition(5, 'b', 5);
        assert_eq!(automaton.states().len(), 1);
        assert_eq!(automaton.transitions().len(), 1);
    }

    #[test]
    fn test_merge_with_controls_initial_states() {
        let mut left = AutomatonBuilder::new(alphabet());
        left.with_initial([0u32]).with_transition(0, 'a', 0);

        let mut right = AutomatonBuilder::new(alphabet());
        right.with_initial([1u32]).with_accepting([2]).with_transition(1, 'b', 2);

        let mut merged = left.clone();
        merged.merge_with(false, [right.clone()]);
        assert_eq!(merged.initial_states().len(), 1);
        assert!(merged.has_state(&1));
        assert!(merged.accepting_states().contains(&2));
        assert_eq!(merged.transitions().len(), 2);

        let mut merged = left;
        merged.merge_with(true, [right]);
        assert_eq!(merged.initial_states().len(), 2);
    }

    #[test]
    fn test_remove_transitions() {
        let mut builder = AutomatonBuilder::new(alphabet());
        builder
            .with_initial([0u32])
            .with_states([1, 2])
            .with_transition(0, 'a', 1)
            .with_transition(0, 'b', 2)
            .with_transition(1, 'a', 2);

        builder.remove_transitions_on(&0, &'a');
        assert_eq!(builder.transitions().len(), 2);

        builder.remove_transitions(&0);
        assert_eq!(builder.transitions().len(), 1);

        builder.clear_transitions();
        assert!(builder.transitions().is_empty());
    }

    #[test]
    fn test_dfa_builder_folds_determinacy_faults() {
        // 0 -a-> {0, 1} ambiguous; 1 lacks both symbols; two initial states
        let mut builder = DfaBuilder::new(alphabet());
        builder
            .with_initial([0u32, 1])
            .with_transition(0, 'a', 0)
            .with_transition(0, 'a', 1)
            .with_transition(0, 'b', 0);

        let faults = builder.validate();
        assert!(faults.contains(&Fault::MultipleInitialStates));
        assert!(faults.contains(&Fault::AmbiguousTransition {
            state: 0,
            symbol: Some('a'),
            targets: vec![0, 1],
        }));
        assert!(faults.contains(&Fault::MissingTransition {
            state: 1,
            symbol: 'a',
        }));
        assert!(faults.contains(&Fault::MissingTransition {
            state: 1,
            symbol: 'b',
        }));
        assert_eq!(faults.len(), 4);
    }

    #[test]
    fn test_dfa_builder_rejects_epsilon_transitions() {
        let mut builder = DfaBuilder::new(alphabet());
        builder
            .ensure_totality(false)
            .with_initial([0u32])
            .with_transition(0, 'a', 0)
            .with_transition(0, 'b', 0)
            .with_epsilon_transition(0, 0);

        let faults = builder.validate();
        assert_eq!(faults.len(), 1);
        assert!(faults.contains(&Fault::AmbiguousTransition {
            state: 0,
            symbol: None,
            targets: vec![0],
        }));
    }

    #[test]
    fn test_dfa_builder_tolerates_incompleteness_when_asked() {
        // deterministic but partial: 1 has no outgoing transitions
        let mut builder = DfaBuilder::new(alphabet());
        builder
            .ensure_totality(false)
            .with_initial([0u32])
            .with_accepting([1])
            .with_transition(0, 'a', 1)
            .with_transition(0, 'b', 0);

        let automaton = builder.build().expect("determinism is enough here");
        assert!(automaton.is_deterministic());
        assert!(!automaton.is_total());
    }

    #[test]
    fn test_dfa_builder_accepts_total_dfa() {
        let mut builder = DfaBuilder::new(alphabet());
        builder
            .with_initial([0u32])
            .with_accepting([1])
            .with_transition(0, 'a', 1)
            .with_transition(0, 'b', 0)
            .with_transition(1, 'a', 1)
            .with_transition(1, 'b', 0);

        let automaton = builder.build().expect("total DFA");
        assert!(automaton.is_deterministic());
        assert!(automaton.is_total());
    }

    #[test]
    fn test_fault_collection_completeness() {
        // no initial state; one fully dangling transition; one ambiguous
        // pair; one missing transition under totality mode
        let mut builder = DfaBuilder::new(Alphabet::from_iter(['a']));
        builder
            .with_states([0u32, 1])
            .with_transition(0, 'a', 0)
            .with_transition(0, 'a', 1)
            .with_transition(7, 'z', 8);

        let faults = builder.validate();
        assert!(faults.contains(&Fault::MissingInitialState));
        assert!(faults.contains(&Fault::UnknownOrigin {
            origin: 7,
            transition: Transition::new('z', 8),
        }));
        assert!(faults.contains(&Fault::UnknownSymbol {
            origin: 7,
            transition: Transition::new('z', 8),
        }));
        assert!(faults.contains(&Fault::UnknownTarget {
            origin: 7,
            transition: Transition::new('z', 8),
        }));
        assert!(faults.contains(&Fault::AmbiguousTransition {
            state: 0,
            symbol: Some('a'),
            targets: vec![0, 1],
        }));
        assert!(faults.contains(&Fault::MissingTransition {
            state: 1,
            symbol: 'a',
        }));
        assert_eq!(faults.len(), 6);
    }
}
