//! Finite-automaton engine for regular-language tooling.
//!
//! This crate provides nondeterministic finite automata with optional
//! epsilon transitions and possibly several initial states, with:
//! - fault-reporting construction through [`AutomatonBuilder`] and
//!   [`DfaBuilder`]; validation returns a [`FaultCollection`], it never
//!   throws
//! - epsilon-closure computation and determinism/totality analysis,
//!   memoized per automaton instance
//! - subset construction ([`Automaton::determinize`]) and totalization
//! - union, intersection, symmetric difference, and complement through one
//!   parameterized product construction
//! - synchronous lock-step execution of all nondeterministic branches
//!   ([`Executor`]), without materializing a determinized automaton
//!
//! States and symbols are generic: anything equatable, hashable (and, for
//! states, ordered) works, and the composite states produced by the
//! composition algorithms are ordinary values of the same kind. All
//! algorithms are synchronous and single-threaded; determinization and
//! products are worst-case exponential with no built-in limit.

mod alphabet;
mod automaton;
mod builder;
mod determinize;
mod executor;
mod fault;
mod product;
mod state;
mod symbol;
mod totalize;
mod transition;

pub use alphabet::Alphabet;
pub use automaton::Automaton;
pub use builder::{AutomatonBuilder, DfaBuilder};
pub use executor::{Configuration, Executor};
pub use fault::{Fault, FaultCategory, FaultCollection, FaultKind};
pub use state::{CountingSupplier, State, StateSupplier};
pub use symbol::Symbol;
pub use transition::{Transition, TransitionTable};
