//! Fault taxonomy for automaton construction and analysis.
//!
//! Faults are plain data, never thrown: validation and analysis return a
//! [`FaultCollection`] and callers decide what to tolerate. The taxonomy has
//! three categories: syntax faults from the builder (dangling references,
//! no initial state), determinism faults, and totality faults. The
//! latter two are independently queryable so a caller can accept an
//! incomplete transition function while still rejecting nondeterminism.

use std::fmt;

use crate::state::State;
use crate::symbol::Symbol;
use crate::transition::Transition;

/// One violation found while validating a builder or analyzing an automaton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault<S, A> {
    /// The initial state set is empty.
    #[error("automaton has no initial state")]
    MissingInitialState,

    /// A transition leaves a state that was never declared.
    #[error("transition {transition:?} leaves undeclared state {origin:?}")]
    UnknownOrigin {
        /// The undeclared origin.
        origin: S,
        /// The offending transition.
        transition: Transition<S, A>,
    },

    /// A transition reads a symbol outside the declared alphabet.
    #[error("transition {transition:?} from {origin:?} reads a symbol outside the alphabet")]
    UnknownSymbol {
        /// The transition's origin.
        origin: S,
        /// The offending transition.
        transition: Transition<S, A>,
    },

    /// A transition enters a state that was never declared.
    #[error("transition {transition:?} from {origin:?} enters an undeclared state")]
    UnknownTarget {
        /// The transition's origin.
        origin: S,
        /// The offending transition.
        transition: Transition<S, A>,
    },

    /// A state can reach several destinations for one input: either two or
    /// more transitions on the same symbol, or any epsilon transition
    /// (`symbol = None`).
    #[error("state {state:?} has ambiguous transitions on {symbol:?} into {targets:?}")]
    AmbiguousTransition {
        /// The nondeterministic state.
        state: S,
        /// The ambiguous symbol, `None` for epsilon.
        symbol: Option<A>,
        /// Every conflicting destination, in transition-table order.
        targets: Vec<S>,
    },

    /// The automaton has more than one initial state.
    #[error("automaton has more than one initial state")]
    MultipleInitialStates,

    /// A (state, symbol) pair has no outgoing transition.
    #[error("state {state:?} has no transition on {symbol:?}")]
    MissingTransition {
        /// The incomplete state.
        state: S,
        /// The symbol with no transition.
        symbol: A,
    },
}

/// Fieldless discriminant of a [`Fault`], for membership queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// See [`Fault::MissingInitialState`].
    MissingInitialState,
    /// See [`Fault::UnknownOrigin`].
    UnknownOrigin,
    /// See [`Fault::UnknownSymbol`].
    UnknownSymbol,
    /// See [`Fault::UnknownTarget`].
    UnknownTarget,
    /// See [`Fault::AmbiguousTransition`].
    AmbiguousTransition,
    /// See [`Fault::MultipleInitialStates`].
    MultipleInitialStates,
    /// See [`Fault::MissingTransition`].
    MissingTransition,
}

/// The three fault categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultCategory {
    /// Builder-level violations: dangling references, no initial state.
    Syntax,
    /// Semantic nondeterminism: ambiguity, epsilon, several initial states.
    Determinism,
    /// Incomplete transition function.
    Totality,
}

impl<S: State, A: Symbol> Fault<S, A> {
    /// The discriminant of this fault.
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::MissingInitialState => FaultKind::MissingInitialState,
            Fault::UnknownOrigin { .. } => FaultKind::UnknownOrigin,
            Fault::UnknownSymbol { .. } => FaultKind::UnknownSymbol,
            Fault::UnknownTarget { .. } => FaultKind::UnknownTarget,
            Fault::AmbiguousTransition { .. } => FaultKind::AmbiguousTransition,
            Fault::MultipleInitialStates => FaultKind::MultipleInitialStates,
            Fault::MissingTransition { .. } => FaultKind::MissingTransition,
        }
    }

    /// The category this fault belongs to.
    pub fn category(&self) -> FaultCategory {
        match self {
            Fault::MissingInitialState
            | Fault::UnknownOrigin { .. }
            | Fault::UnknownSymbol { .. }
            | Fault::UnknownTarget { .. } => FaultCategory::Syntax,
            Fault::AmbiguousTransition { .. } | Fault::MultipleInitialStates => {
                FaultCategory::Determinism
            }
            Fault::MissingTransition { .. } => FaultCategory::Totality,
        }
    }
}

/// An ordered, immutable list of faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultCollection<S, A> {
    faults: Vec<Fault<S, A>>,
}

impl<S: State, A: Symbol> FaultCollection<S, A> {
    pub(crate) fn new() -> Self {
        Self { faults: Vec::new() }
    }

    pub(crate) fn push(&mut self, fault: Fault<S, A>) {
        self.faults.push(fault);
    }

    /// Iterate over the faults in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &Fault<S, A>> {
        self.faults.iter()
    }

    /// Number of faults.
    pub fn len(&self) -> usize {
        self.faults.len()
    }

    /// Check whether no fault was found.
    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// Check whether a specific fault value is present.
    pub fn contains(&self, fault: &Fault<S, A>) -> bool {
        self.faults.contains(fault)
    }

    /// Check whether any fault of the given kind is present.
    pub fn contains_kind(&self, kind: FaultKind) -> bool {
        self.iter().any(|fault| fault.kind() == kind)
    }

    /// Check whether any determinism fault is present.
    pub fn has_determinism_faults(&self) -> bool {
        self.of_category(FaultCategory::Determinism).next().is_some()
    }

    /// Check whether any totality fault is present.
    pub fn has_totality_faults(&self) -> bool {
        self.of_category(FaultCategory::Totality).next().is_some()
    }

    /// Iterate over the faults of one category, preserving order.
    pub fn of_category(&self, category: FaultCategory) -> impl Iterator<Item = &Fault<S, A>> {
        self.iter().filter(move |fault| fault.category() == category)
    }
}

impl<S: State, A: Symbol> fmt::Display for FaultCollection<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} fault(s):", self.len())?;
        for fault in self.iter() {
            writeln!(f, "  {fault}")?;
        }
        Ok(())
    }
}

impl<S: State, A: Symbol> std::error::Error for FaultCollection<S, A> {}

impl<S, A> IntoIterator for FaultCollection<S, A> {
    type Item = Fault<S, A>;
    type IntoIter = std::vec::IntoIter<Fault<S, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.faults.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let syntax: Fault<u32, char> = Fault::UnknownOrigin {
            origin: 9,
            transition: Transition::new('a', 0),
        };
        let determinism: Fault<u32, char> = Fault::MultipleInitialStates;
        let totality: Fault<u32, char> = Fault::MissingTransition {
            state: 0,
            symbol: 'a',
        };

        assert_eq!(syntax.category(), FaultCategory::Syntax);
        assert_eq!(determinism.category(), FaultCategory::Determinism);
        assert_eq!(totality.category(), FaultCategory::Totality);
    }

    #[test]
    fn test_collection_predicates() {
        let mut faults: FaultCollection<u32, char> = FaultCollection::new();
        assert!(faults.is_empty());
        assert!(!faults.has_determinism_faults());

        faults.push(Fault::MissingTransition {
            state: 0,
            symbol: 'a',
        });
        faults.push(Fault::MultipleInitialStates);

        assert_eq!(faults.len(), 2);
        assert!(faults.has_determinism_faults());
        assert!(faults.has_totality_faults());
        assert!(faults.contains_kind(FaultKind::MissingTransition));
        assert!(!faults.contains_kind(FaultKind::MissingInitialState));
        assert_eq!(faults.of_category(FaultCategory::Totality).count(), 1);
    }
}
