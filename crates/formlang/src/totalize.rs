//! Totalization: completing the transition function without changing the
//! recognized language.

use crate::automaton::Automaton;
use crate::builder::AutomatonBuilder;
use crate::fault::Fault;
use crate::state::{State, StateSupplier};
use crate::symbol::Symbol;

impl<S: State, A: Symbol> Automaton<S, A> {
    /// An automaton that behaves identically on every word but has a
    /// transition for every (state, symbol) pair.
    ///
    /// If the determinacy analysis reports no totality faults the automaton
    /// is returned unchanged (a plain clone). Otherwise `supplier` mints one
    /// discard state (self-looping on every alphabet symbol, never
    /// accepting) and every missing (state, symbol) pair, as enumerated by
    /// the totality faults, is redirected into it. Words that previously
    /// died on a missing transition now end in the discard state; either way
    /// they are rejected, so the language is unchanged.
    pub fn totalify(&self, supplier: &mut impl StateSupplier<S>) -> Automaton<S, A> {
        let missing: Vec<(S, A)> = self
            .check_determinacy()
            .iter()
            .filter_map(|fault| match fault {
                Fault::MissingTransition { state, symbol } => {
                    Some((state.clone(), symbol.clone()))
                }
                _ => None,
            })
            .collect();
        if missing.is_empty() {
            return self.clone();
        }

        let discard = supplier.fresh();
        debug_assert!(
            !self.states().contains(&discard),
            "state supplier returned a state already present: {discard:?}"
        );

        let mut builder = AutomatonBuilder::from_automaton(self);
        builder.with_states([discard.clone()]);
        for symbol in self.alphabet().iter() {
            builder.with_transition(discard.clone(), symbol.clone(), discard.clone());
        }
        for (state, symbol) in missing {
            builder.with_transition(state, symbol, discard.clone());
        }
        builder
            .build()
            .expect("totalization is correct by construction")
    }
}
