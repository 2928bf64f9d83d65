//! Randomized, sublinear property testing for regular languages.
//!
//! The crate implements the property tester of Bathie and Starikovskaya for membership in
//! regular languages. Given a nondeterministic finite automaton ([`Nfa`]) and an input word, the
//! tester distinguishes words that belong to the language of the automaton from words that are
//! *far* from it in edit distance, while reading only a polylogarithmic number of letters of the
//! input. Words in the language are always accepted, regardless of the random draws. Words at
//! edit distance at least `eps * n` from the language are rejected with probability at least
//! `1 - error_proba`. For words strictly in between, either verdict may be returned.
//!
//! The building blocks are exposed individually:
//! - [`Nfa`] stores states and labeled transitions and provides the reachability closures
//!   ([`Nfa::star_reach`], [`Nfa::letter_reach`]), exact simulation ([`Nfa::accepts`]) and a
//!   cached strongly connected component count ([`Nfa::num_scc`]).
//! - [`PropertyTester`] derives the sampling parameters from the automaton, draws a multiset of
//!   random input fragments and merges them into an over-approximation of the reachable state
//!   set, from which the verdict is read off. The free function [`property_test`] is the
//!   one-shot entry point.
//! - [`distance::edit_distance`] computes the exact edit distance of a word to the language.
//!   It exists to validate tester verdicts in experiments and is never consulted by the tester
//!   itself.
//!
//! The automaton is generic over the symbol type, so languages over `char`, integers or any
//! other type with equality can be tested. Randomness is always drawn from an explicitly
//! injected, seedable [`fastrand::Rng`], which makes every run reproducible.
//!
//! # Example
//! ```
//! use regularity::prelude::*;
//!
//! // Automaton for (ab)*
//! let mut nfa = Nfa::with_states(2);
//! nfa.add_transition(0, 'a', 1).unwrap();
//! nfa.add_transition(1, 'b', 0).unwrap();
//! nfa.set_initial(0).unwrap();
//! nfa.set_final(0).unwrap();
//!
//! assert!(nfa.accepts(&"abab"));
//! assert!(!nfa.accepts(&"abb"));
//!
//! let word: Vec<char> = std::iter::repeat(['a', 'b']).take(10_000).flatten().collect();
//! let mut tester = PropertyTester::new(0.3, 0.3).unwrap().with_seed(42);
//! assert!(tester.test(&mut nfa, &word));
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude makes using this crate easier, `use regularity::prelude::*;` brings all
/// relevant types and traits into scope.
pub mod prelude {
    pub use super::{
        distance,
        nfa::{Nfa, StateOutOfRange, StateSet},
        property_test, random,
        tester::{ParameterError, PropertyTester},
        word::FiniteWord,
        Symbol,
    };
}

use std::fmt::Debug;

/// Module defining the automaton representation together with its reachability primitives.
pub mod nfa;
pub use nfa::{Nfa, StateOutOfRange, StateSet};

/// Module containing the randomized tester built on top of [`Nfa`].
pub mod tester;
pub use tester::{property_test, ParameterError, PropertyTester};

/// Module defining the finite word abstraction consumed by the automaton.
pub mod word;
pub use word::FiniteWord;

/// Ground-truth edit distance computation, used to validate tester verdicts.
pub mod distance;

/// Generation of random automata and random words for experiments.
pub mod random;

/// A symbol is anything that can label a transition: it merely needs to be comparable for
/// equality, cheap to copy and printable for diagnostics.
pub trait Symbol: Eq + Copy + Debug {}

impl<S: Eq + Copy + Debug> Symbol for S {}
