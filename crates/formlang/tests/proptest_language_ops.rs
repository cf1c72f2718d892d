//! Randomized language-level properties of the composition algorithms.
//!
//! Small random NFAs over {a, b}, with epsilon transitions, several initial
//! states, and incomplete transition functions, are pushed through
//! determinization, totalization, products, and complement, and checked
//! word-by-word against the originals.

use proptest::prelude::*;

use formlang::{Alphabet, Automaton, AutomatonBuilder, CountingSupplier};

fn alphabet() -> Alphabet<char> {
    Alphabet::from_iter(['a', 'b'])
}

fn symbol_strategy() -> impl Strategy<Value = Option<char>> {
    prop_oneof![Just(None), Just(Some('a')), Just(Some('b'))]
}

fn nfa_strategy() -> impl Strategy<Value = Automaton<u32, char>> {
    (2u32..=4).prop_flat_map(|size| {
        (
            Just(size),
            proptest::collection::vec((0..size, symbol_strategy(), 0..size), 0..12),
            proptest::collection::vec(0..size, 1..=2),
            proptest::collection::vec(0..size, 0..=2),
        )
            .prop_map(|(size, transitions, initial, accepting)| {
                let mut builder = AutomatonBuilder::new(alphabet());
                builder
                    .with_states(0..size)
                    .with_initial(initial)
                    .with_accepting(accepting);
                for (origin, symbol, target) in transitions {
                    match symbol {
                        Some(symbol) => builder.with_transition(origin, symbol, target),
                        None => builder.with_epsilon_transition(origin, target),
                    };
                }
                builder.build().expect("generated automaton is well-formed")
            })
    })
}

fn word_strategy() -> impl Strategy<Value = Vec<char>> {
    proptest::collection::vec(prop_oneof![Just('a'), Just('b')], 0..6)
}

proptest! {
    #[test]
    fn determinize_yields_an_equivalent_total_dfa(
        nfa in nfa_strategy(),
        word in word_strategy(),
    ) {
        let dfa = nfa.determinize();
        prop_assert!(dfa.is_deterministic());
        prop_assert!(dfa.is_total());
        prop_assert_eq!(dfa.initial_states().len(), 1);
        prop_assert_eq!(nfa.accepts(&word), dfa.accepts(&word));
    }

    #[test]
    fn determinize_is_idempotent_up_to_relabeling(nfa in nfa_strategy()) {
        let once = nfa.determinize();
        let twice = once.determinize();
        prop_assert_eq!(once.states().len(), twice.states().len());
        prop_assert_eq!(once.transitions().len(), twice.transitions().len());
        prop_assert!(once.equivalent_to(&twice));
    }

    #[test]
    fn complement_flips_acceptance(
        nfa in nfa_strategy(),
        word in word_strategy(),
    ) {
        let complement = nfa.complement();
        prop_assert_eq!(complement.accepts(&word), !nfa.accepts(&word));
    }

    #[test]
    fn products_agree_with_boolean_word_semantics(
        left in nfa_strategy(),
        right in nfa_strategy(),
        word in word_strategy(),
    ) {
        let l = left.accepts(&word);
        let r = right.accepts(&word);
        prop_assert_eq!(left.union(&right).accepts(&word), l || r);
        prop_assert_eq!(left.intersection(&right).accepts(&word), l && r);
        prop_assert_eq!(left.symmetric_difference(&right).accepts(&word), l != r);
    }

    #[test]
    fn totalify_preserves_the_language(
        nfa in nfa_strategy(),
        word in word_strategy(),
    ) {
        let mut supplier = CountingSupplier::above(&nfa);
        let total = nfa.totalify(&mut supplier);
        prop_assert!(total.is_total());
        prop_assert_eq!(nfa.accepts(&word), total.accepts(&word));
    }

    #[test]
    fn an_automaton_is_equivalent_to_its_own_determinization(nfa in nfa_strategy()) {
        prop_assert!(nfa.equivalent_to(&nfa.determinize()));
    }

    #[test]
    fn relabeling_preserves_the_language(
        nfa in nfa_strategy(),
        word in word_strategy(),
    ) {
        let relabeled = nfa.determinize().relabel_numbered();
        prop_assert_eq!(nfa.accepts(&word), relabeled.accepts(&word));
    }
}
