//! Product construction, complement, and language equivalence.
//!
//! Union, intersection, and symmetric difference are one algorithm: a
//! breadth-first walk over pairs of states, parameterized by the combinator
//! that decides which pairs accept. Complement rides on determinization or
//! totalization plus an accepting-set flip.

use std::collections::{BTreeSet, VecDeque};

use indexmap::IndexSet;
use itertools::Itertools;

use crate::automaton::Automaton;
use crate::builder::AutomatonBuilder;
use crate::state::{State, StateSupplier};
use crate::symbol::Symbol;

impl<S: State, A: Symbol> Automaton<S, A> {
    /// General product: determinize both operands, then take the syntactic
    /// product with `accepting` as the combinator.
    ///
    /// Determinization guarantees the syntactic product's preconditions
    /// (determinism, totality, a single initial state), at worst-case
    /// exponential cost in the operand sizes.
    pub fn product_with<S2: State>(
        &self,
        other: &Automaton<S2, A>,
        accepting: impl Fn(bool, bool) -> bool,
    ) -> Automaton<(BTreeSet<S>, BTreeSet<S2>), A> {
        self.determinize()
            .syntactic_product_with(&other.determinize(), accepting)
    }

    /// Syntactic product over pairs of states, without determinizing first.
    ///
    /// Precondition (unchecked in release builds): both operands are
    /// deterministic with exactly one initial state. Feeding anything else
    /// in yields a semantically meaningless automaton: debug builds assert,
    /// release builds keep the original's silent behavior.
    ///
    /// A pair accepts iff `accepting(left_accepts, right_accepts)`, where
    /// each side tests the epsilon-closure of its component against that
    /// automaton's accepting set, so the result stays correct even for an
    /// epsilon-free nondeterministic operand that slipped past the
    /// precondition. Successors are formed per symbol as the cross product
    /// of both sides' one-step reachable sets, and only reachable pairs are
    /// ever constructed. The product's alphabet is the union of the operand
    /// alphabets.
    pub fn syntactic_product_with<S2: State>(
        &self,
        other: &Automaton<S2, A>,
        accepting: impl Fn(bool, bool) -> bool,
    ) -> Automaton<(S, S2), A> {
        debug_assert!(
            self.initial_states().len() == 1 && self.is_deterministic(),
            "left operand of a syntactic product must be deterministic with one initial state"
        );
        debug_assert!(
            other.initial_states().len() == 1 && other.is_deterministic(),
            "right operand of a syntactic product must be deterministic with one initial state"
        );

        let alphabet = self.alphabet().union(other.alphabet());
        let mut builder = AutomatonBuilder::new(alphabet.clone());

        let start = (
            self.initial_states()
                .iter()
                .next()
                .expect("a built automaton has an initial state")
                .clone(),
            other
                .initial_states()
                .iter()
                .next()
                .expect("a built automaton has an initial state")
                .clone(),
        );
        builder.with_initial([start.clone()]);

        let mut seen: IndexSet<(S, S2)> = IndexSet::new();
        seen.insert(start.clone());
        let mut queue = VecDeque::from([start]);

        while let Some((left, right)) = queue.pop_front() {
            let pair = (left.clone(), right.clone());
            if accepting(self.closure_accepts(&left), other.closure_accepts(&right)) {
                builder.with_accepting([pair.clone()]);
            } else {
                builder.with_states([pair.clone()]);
            }
            for symbol in alphabet.iter() {
                let left_successors = self.reachable_with(&left, symbol);
                let right_successors = other.reachable_with(&right, symbol);
                for (left_next, right_next) in left_successors
                    .iter()
                    .cartesian_product(right_successors.iter())
                {
                    let successor = (left_next.clone(), right_next.clone());
                    builder.with_transition(pair.clone(), symbol.clone(), successor.clone());
                    if seen.insert(successor.clone()) {
                        queue.push_back(successor);
                    }
                }
            }
        }

        builder
            .build()
            .expect("product construction is correct by construction")
    }

    /// The automaton recognizing the union of both languages.
    pub fn union<S2: State>(
        &self,
        other: &Automaton<S2, A>,
    ) -> Automaton<(BTreeSet<S>, BTreeSet<S2>), A> {
        self.product_with(other, |left, right| left || right)
    }

    /// The automaton recognizing the intersection of both languages.
    pub fn intersection<S2: State>(
        &self,
        other: &Automaton<S2, A>,
    ) -> Automaton<(BTreeSet<S>, BTreeSet<S2>), A> {
        self.product_with(other, |left, right| left && right)
    }

    /// The automaton recognizing the symmetric difference of both languages.
    pub fn symmetric_difference<S2: State>(
        &self,
        other: &Automaton<S2, A>,
    ) -> Automaton<(BTreeSet<S>, BTreeSet<S2>), A> {
        self.product_with(other, |left, right| left != right)
    }

    /// Whether both automata accept exactly the same words: the symmetric
    /// difference of the two languages is empty.
    pub fn equivalent_to<S2: State>(&self, other: &Automaton<S2, A>) -> bool {
        self.symmetric_difference(other).is_empty()
    }

    /// The automaton recognizing the complement of this language:
    /// determinize (total by construction), then flip the accepting set
    /// within the state set.
    pub fn complement(&self) -> Automaton<BTreeSet<S>, A> {
        let determinized = self.determinize();
        flip_accepting(&determinized)
    }

    /// Complement without determinizing first.
    ///
    /// Precondition as for [`syntactic_product_with`]: the automaton must be
    /// deterministic with one initial state (debug-asserted only). Missing
    /// transitions are completed through `supplier` before the accepting set
    /// is flipped, so words that previously died now land in the accepting
    /// discard state.
    ///
    /// [`syntactic_product_with`]: Automaton::syntactic_product_with
    pub fn syntactic_complement(&self, supplier: &mut impl StateSupplier<S>) -> Automaton<S, A> {
        debug_assert!(
            self.initial_states().len() == 1 && self.is_deterministic(),
            "syntactic complement requires a deterministic automaton with one initial state"
        );
        let total = self.totalify(supplier);
        flip_accepting(&total)
    }
}

/// Replace the accepting set by its complement within the state set. Only
/// meaningful on a total, deterministic automaton.
fn flip_accepting<S: State, A: Symbol>(automaton: &Automaton<S, A>) -> Automaton<S, A> {
    let flipped: Vec<S> = automaton
        .states()
        .iter()
        .filter(|state| !automaton.accepting_states().contains(*state))
        .cloned()
        .collect();
    let mut builder = AutomatonBuilder::from_automaton(automaton);
    builder.override_accepting(flipped);
    builder
        .build()
        .expect("complement of a well-formed automaton is well-formed")
}
