use itertools::Itertools;
use tracing::trace;

use crate::word::FiniteWord;
use crate::Symbol;

mod connected_components;

/// A set of states of an [`Nfa`], represented as a bit-vector indexed by state.
///
/// The reachability closures [`Nfa::star_reach`] and [`Nfa::letter_reach`] consume and produce
/// values of this type.
pub type StateSet = bit_set::BitSet;

/// The error raised when a state index outside of `[0, num_states)` is passed to an automaton
/// operation. All index-taking operations are checked, an out-of-range index can never corrupt
/// the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("state {index} is out of range for an automaton with {states} states")]
pub struct StateOutOfRange {
    /// The offending index.
    pub index: usize,
    /// The number of states of the automaton that rejected it.
    pub states: usize,
}

/// A single labeled transition, stored in the adjacency list of its source state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition<S> {
    pub(crate) label: S,
    pub(crate) to: usize,
}

/// A nondeterministic finite automaton over symbols of type `S`.
///
/// States are plain indices in `[0, num_states)`, fixed at construction time. Transitions and
/// initial/final markings are added incrementally. Duplicate transitions are permitted and
/// harmless.
///
/// The number of strongly connected components is cached: [`Nfa::num_scc`] recomputes it only
/// if a transition was added since the last computation. The intended discipline is to build
/// the automaton fully, [`Nfa::freeze`] it once and from then on share it read-only.
///
/// # Example
/// ```
/// use regularity::Nfa;
///
/// // Language 0*1+ over the alphabet {0, 1}.
/// let mut nfa = Nfa::with_states(2);
/// nfa.add_transition(0, 0u8, 0).unwrap();
/// nfa.add_transition(0, 1u8, 1).unwrap();
/// nfa.add_transition(1, 1u8, 1).unwrap();
/// nfa.set_initial(0).unwrap();
/// nfa.set_final(1).unwrap();
///
/// assert!(nfa.accepts(&[0u8, 0, 0, 1]));
/// assert!(!nfa.accepts(&[0u8, 0, 0]));
/// ```
#[derive(Clone)]
pub struct Nfa<S> {
    num_states: usize,
    initial_states: StateSet,
    final_states: StateSet,
    transitions: Vec<Vec<Transition<S>>>,
    // None whenever a transition was added since the last computation.
    scc_count: Option<usize>,
}

impl<S: Symbol> Nfa<S> {
    /// Creates an automaton with `num_states` states, no transitions and empty initial and
    /// final sets.
    pub fn with_states(num_states: usize) -> Self {
        Self {
            num_states,
            initial_states: StateSet::with_capacity(num_states),
            final_states: StateSet::with_capacity(num_states),
            transitions: vec![Vec::new(); num_states],
            scc_count: None,
        }
    }

    fn check(&self, index: usize) -> Result<(), StateOutOfRange> {
        if index < self.num_states {
            Ok(())
        } else {
            Err(StateOutOfRange {
                index,
                states: self.num_states,
            })
        }
    }

    /// The number of states of the automaton.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Adds the transition `from --label--> to`. Invalidates the cached SCC count.
    pub fn add_transition(&mut self, from: usize, label: S, to: usize) -> Result<(), StateOutOfRange> {
        self.check(from)?;
        self.check(to)?;
        self.transitions[from].push(Transition { label, to });
        self.scc_count = None;
        Ok(())
    }

    /// Marks state `i` as initial. Idempotent.
    pub fn set_initial(&mut self, i: usize) -> Result<(), StateOutOfRange> {
        self.check(i)?;
        self.initial_states.insert(i);
        Ok(())
    }

    /// Marks state `i` as final. Idempotent.
    pub fn set_final(&mut self, i: usize) -> Result<(), StateOutOfRange> {
        self.check(i)?;
        self.final_states.insert(i);
        Ok(())
    }

    /// Whether state `i` is initial.
    pub fn is_initial(&self, i: usize) -> Result<bool, StateOutOfRange> {
        self.check(i)?;
        Ok(self.initial_states.contains(i))
    }

    /// Whether state `i` is final.
    pub fn is_final(&self, i: usize) -> Result<bool, StateOutOfRange> {
        self.check(i)?;
        Ok(self.final_states.contains(i))
    }

    /// Whether the exact transition `from --label--> to` exists. Scans the out-edges of
    /// `from`, so the cost is proportional to its out-degree.
    pub fn is_transition(&self, from: usize, label: S, to: usize) -> Result<bool, StateOutOfRange> {
        self.check(from)?;
        self.check(to)?;
        Ok(self.transitions[from]
            .iter()
            .any(|t| t.label == label && t.to == to))
    }

    /// The set of initial states.
    pub fn initial_states(&self) -> &StateSet {
        &self.initial_states
    }

    /// The set of final states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub(crate) fn transitions_from(&self, state: usize) -> &[Transition<S>] {
        &self.transitions[state]
    }

    /// The number of strongly connected components of the transition graph, computed with
    /// Kosaraju's algorithm. Linear in states plus edges on recomputation, constant time while
    /// no transition has been added since the last call.
    pub fn num_scc(&mut self) -> usize {
        if let Some(count) = self.scc_count {
            return count;
        }
        trace!(states = self.num_states, "recomputing scc count");
        let count = connected_components::kosaraju_count(&self.transitions, self.num_states);
        self.scc_count = Some(count);
        count
    }

    /// Computes and caches the SCC count so that the automaton can subsequently be shared
    /// read-only without ever needing `&mut` access again.
    pub fn freeze(&mut self) {
        self.num_scc();
    }

    /// The cached SCC count, if no transition has been added since it was last computed.
    pub fn scc_count(&self) -> Option<usize> {
        self.scc_count
    }

    /// The set of states reachable from any state in `from` by zero or more transitions of any
    /// label. The result is always a superset of `from` and the operator is idempotent:
    /// `star_reach(star_reach(s)) == star_reach(s)`.
    pub fn star_reach(&self, from: &StateSet) -> StateSet {
        let mut seen = from.clone();
        let mut stack: Vec<usize> = from.iter().collect();
        while let Some(q) = stack.pop() {
            for t in &self.transitions[q] {
                if seen.insert(t.to) {
                    stack.push(t.to);
                }
            }
        }
        seen
    }

    /// The set of states reachable from any state in `from` by exactly one transition labeled
    /// `a`. Does not contain `from` unless an `a`-self-loop exists; in particular the image of
    /// the empty set is empty.
    pub fn letter_reach(&self, from: &StateSet, a: &S) -> StateSet {
        let mut seen = StateSet::with_capacity(self.num_states);
        for q in from.iter() {
            for t in &self.transitions[q] {
                if t.label == *a {
                    seen.insert(t.to);
                }
            }
        }
        seen
    }

    /// Tests exactly whether `word` belongs to the language of the automaton by simulating it:
    /// the current state set starts as the initial set and is replaced by its
    /// [`letter_reach`][Nfa::letter_reach] image for every symbol in turn. Deterministic and
    /// free of side effects.
    pub fn accepts<W: FiniteWord<Symbol = S> + ?Sized>(&self, word: &W) -> bool {
        let mut current = self.initial_states.clone();
        for symbol in word.symbols() {
            current = self.letter_reach(&current, &symbol);
        }
        !current.is_disjoint(&self.final_states)
    }
}

impl<S: Symbol> std::fmt::Debug for Nfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Nfa with {} states, initial {:?}, final {:?}",
            self.num_states,
            self.initial_states.iter().collect_vec(),
            self.final_states.iter().collect_vec()
        )?;
        for (from, out) in self.transitions.iter().enumerate() {
            for t in out {
                writeln!(f, "  {} --{:?}--> {}", from, t.label, t.to)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Automaton for (ab)* over {a, b}.
    fn ab_star() -> Nfa<char> {
        let mut nfa = Nfa::with_states(2);
        nfa.add_transition(0, 'a', 1).unwrap();
        nfa.add_transition(1, 'b', 0).unwrap();
        nfa.set_initial(0).unwrap();
        nfa.set_final(0).unwrap();
        nfa
    }

    /// Automaton for 0*1+ over {0, 1}.
    fn zero_star_one_plus() -> Nfa<u8> {
        let mut nfa = Nfa::with_states(2);
        nfa.add_transition(0, 0, 0).unwrap();
        nfa.add_transition(0, 1, 1).unwrap();
        nfa.add_transition(1, 1, 1).unwrap();
        nfa.set_initial(0).unwrap();
        nfa.set_final(1).unwrap();
        nfa
    }

    #[test]
    fn accepts_ab_star() {
        let nfa = ab_star();
        assert!(nfa.accepts(&""));
        assert!(nfa.accepts(&"ab"));
        assert!(!nfa.accepts(&"a"));
        assert!(!nfa.accepts(&"aba"));
    }

    #[test]
    fn accepts_zero_star_one_plus() {
        let nfa = zero_star_one_plus();
        assert!(nfa.accepts(&[0u8, 0, 0, 1]));
        assert!(!nfa.accepts(&[0u8, 0, 0]));
        assert!(!nfa.accepts(&[] as &[u8]));
    }

    #[test]
    fn accepts_is_pure() {
        let nfa = ab_star();
        for _ in 0..3 {
            assert!(nfa.accepts(&"abab"));
            assert!(!nfa.accepts(&"abb"));
        }
    }

    #[test]
    fn membership_queries() {
        let nfa = ab_star();
        assert!(nfa.is_initial(0).unwrap());
        assert!(!nfa.is_initial(1).unwrap());
        assert!(nfa.is_final(0).unwrap());
        assert!(nfa.is_transition(0, 'a', 1).unwrap());
        assert!(!nfa.is_transition(0, 'b', 1).unwrap());
        assert!(!nfa.is_transition(1, 'a', 1).unwrap());
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut nfa = ab_star();
        let err = StateOutOfRange {
            index: 2,
            states: 2,
        };
        assert_eq!(nfa.add_transition(2, 'a', 0), Err(err));
        assert_eq!(nfa.add_transition(0, 'a', 2), Err(err));
        assert_eq!(nfa.set_initial(2), Err(err));
        assert_eq!(nfa.set_final(2), Err(err));
        assert_eq!(nfa.is_initial(2), Err(err));
        assert_eq!(nfa.is_transition(0, 'a', 2), Err(err));
        // the failed calls must not have changed anything
        assert!(nfa.accepts(&"ab"));
    }

    #[test]
    fn star_reach_is_idempotent_superset() {
        let mut nfa = Nfa::with_states(4);
        nfa.add_transition(0, 'x', 1).unwrap();
        nfa.add_transition(1, 'y', 2).unwrap();

        let mut from = StateSet::with_capacity(4);
        from.insert(0);
        let once = nfa.star_reach(&from);
        assert!(once.is_superset(&from));
        assert_eq!(once.iter().collect_vec(), vec![0, 1, 2]);
        assert_eq!(nfa.star_reach(&once), once);

        // the empty set reaches nothing
        let empty = StateSet::with_capacity(4);
        assert!(nfa.star_reach(&empty).is_empty());
    }

    #[test]
    fn letter_reach_of_empty_set_is_empty() {
        let nfa = ab_star();
        let empty = StateSet::with_capacity(2);
        assert!(nfa.letter_reach(&empty, &'a').is_empty());
        assert!(nfa.letter_reach(&empty, &'b').is_empty());
    }

    #[test]
    fn letter_reach_single_step() {
        let nfa = zero_star_one_plus();
        let initial = nfa.initial_states().clone();
        let on_zero = nfa.letter_reach(&initial, &0);
        assert_eq!(on_zero.iter().collect_vec(), vec![0]);
        let on_one = nfa.letter_reach(&initial, &1);
        assert_eq!(on_one.iter().collect_vec(), vec![1]);
        // no transition labeled 2 anywhere
        assert!(nfa.letter_reach(&initial, &2).is_empty());
    }

    #[test]
    fn scc_count_of_fresh_automaton_is_num_states() {
        let mut nfa: Nfa<char> = Nfa::with_states(5);
        assert_eq!(nfa.num_scc(), 5);
    }

    #[test]
    fn scc_cache_invalidation() {
        let mut nfa: Nfa<char> = Nfa::with_states(3);
        assert_eq!(nfa.num_scc(), 3);
        assert_eq!(nfa.num_scc(), 3);
        assert_eq!(nfa.scc_count(), Some(3));

        // closing a cycle through all states merges everything into one component
        nfa.add_transition(0, 'a', 1).unwrap();
        assert_eq!(nfa.scc_count(), None);
        nfa.add_transition(1, 'a', 2).unwrap();
        nfa.add_transition(2, 'a', 0).unwrap();
        assert_eq!(nfa.num_scc(), 1);
        assert_eq!(nfa.num_scc(), 1);
    }

    #[test]
    fn freeze_pins_the_scc_count() {
        let mut nfa = ab_star();
        assert_eq!(nfa.scc_count(), None);
        nfa.freeze();
        assert_eq!(nfa.scc_count(), Some(1));
    }
}
