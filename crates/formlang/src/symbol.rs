//! Symbol types for automata transitions.

use std::fmt;
use std::hash::Hash;

/// Requirements on an alphabet symbol.
///
/// The engine only ever compares and hashes symbols; epsilon is not a symbol
/// but the absence of one (`Option<A>::None` on a [`Transition`]).
///
/// [`Transition`]: crate::transition::Transition
pub trait Symbol: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> Symbol for T {}
