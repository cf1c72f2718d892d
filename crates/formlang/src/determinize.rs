//! Subset (powerset) construction.

use std::collections::{BTreeSet, VecDeque};

use indexmap::IndexSet;

use crate::automaton::Automaton;
use crate::builder::AutomatonBuilder;
use crate::state::State;
use crate::symbol::Symbol;

impl<S: State, A: Symbol> Automaton<S, A> {
    /// Convert to a total, deterministic automaton whose states are sets of
    /// this automaton's states.
    ///
    /// The composite identity *is* the set: two different reachable subsets
    /// are distinct states, and identical subsets collapse to one state,
    /// which is what bounds the otherwise-unbounded search. The new initial
    /// state is the union of the epsilon-closures of all initial states;
    /// composites are explored breadth-first, and each gets exactly one
    /// successor per alphabet symbol. The empty composite is an ordinary
    /// state here, self-looping on every symbol: the implicit reject state
    /// that makes the result total. Only reachable composites are created.
    ///
    /// A composite is accepting iff any member is accepting. Worst case the
    /// construction is exponential in the number of input states.
    pub fn determinize(&self) -> Automaton<BTreeSet<S>, A> {
        let mut builder = AutomatonBuilder::new(self.alphabet().clone());

        let initial: BTreeSet<S> = self
            .initial_states()
            .iter()
            .flat_map(|state| self.epsilon_closure_of(state).iter().cloned())
            .collect();
        builder.with_initial([initial.clone()]);

        let mut seen: IndexSet<BTreeSet<S>> = IndexSet::new();
        seen.insert(initial.clone());
        let mut queue = VecDeque::from([initial]);

        while let Some(current) = queue.pop_front() {
            if current.iter().any(|s| self.accepting_states().contains(s)) {
                builder.with_accepting([current.clone()]);
            } else {
                builder.with_states([current.clone()]);
            }
            for symbol in self.alphabet().iter() {
                let successor: BTreeSet<S> = current
                    .iter()
                    .flat_map(|member| self.transitions().transitions_from_on(member, symbol))
                    .flat_map(|transition| {
                        self.epsilon_closure_of(transition.target()).iter().cloned()
                    })
                    .collect();
                builder.with_transition(current.clone(), symbol.clone(), successor.clone());
                if seen.insert(successor.clone()) {
                    queue.push_back(successor);
                }
            }
        }

        builder
            .build()
            .expect("subset construction is correct by construction")
    }
}
