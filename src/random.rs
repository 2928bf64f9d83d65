//! Generation of random automata and random words.
//!
//! These helpers exist for experiments and statistical tests: drawing an automaton with
//! Bernoulli-distributed edges and markings, and drawing uniform words to feed to the tester.
//! All randomness comes from an explicitly passed [`fastrand::Rng`].

use crate::nfa::Nfa;
use crate::Symbol;

/// Generates a random NFA over the binary alphabet `{'0', '1'}` with `states` states.
///
/// Every ordered pair of distinct states receives an edge with probability `edge_probability`,
/// labeled `'0'` or `'1'` with equal probability. Every state independently becomes initial
/// with probability `marking_probability`, and final likewise. The result may well have an
/// empty language; callers that need a nonempty one should retry.
pub fn random_nfa(
    states: usize,
    edge_probability: f64,
    marking_probability: f64,
    rng: &mut fastrand::Rng,
) -> Nfa<char> {
    let mut nfa = Nfa::with_states(states);
    for from in 0..states {
        for to in 0..states {
            if from != to && rng.f64() < edge_probability {
                let label = if rng.bool() { '0' } else { '1' };
                nfa.add_transition(from, label, to)
                    .expect("indices are in range by construction");
            }
        }
    }
    for i in 0..states {
        if rng.f64() < marking_probability {
            nfa.set_initial(i).expect("index in range");
        }
        if rng.f64() < marking_probability {
            nfa.set_final(i).expect("index in range");
        }
    }
    nfa
}

/// Draws a word of length `len` whose letters are picked uniformly from `universe`.
///
/// Panics if `universe` is empty and `len > 0`.
pub fn random_word<S: Symbol>(universe: &[S], len: usize, rng: &mut fastrand::Rng) -> Vec<S> {
    (0..len).map(|_| universe[rng.usize(..universe.len())]).collect()
}
