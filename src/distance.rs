//! Exact edit distance of a word to a regular language.
//!
//! This is the ground-truth oracle used to validate tester verdicts in experiments: it combines
//! an all-pairs shortest path computation over the transition graph (the cheapest number of
//! insertions needed to move between two states) with a position-by-state dynamic program. The
//! cost is `O(m^3 + n * m^2)` for `m` states and a word of length `n`, so it is strictly
//! offline tooling. Nothing in [`crate::tester`] depends on it.

use crate::nfa::Nfa;
use crate::word::FiniteWord;
use crate::Symbol;

/// Computes the minimum number of insertions, deletions and substitutions needed to turn
/// `word` into a member of the language of `nfa`.
///
/// A word in the language has distance `0`. The result is capped at the length of the word: if
/// the language is empty or unreachable from the initial states, that cap is returned.
///
/// `D[i][q]` is the cheapest edit of the length-`i` prefix into a word labeling a run from an
/// initial state to `q`; the answer is the minimum of `D[n][q]` over final states `q`.
pub fn edit_distance<S: Symbol, W: FiniteWord<Symbol = S> + ?Sized>(
    word: &W,
    nfa: &Nfa<S>,
) -> usize {
    let m = nfa.num_states();
    let n = word.len();
    let cap = n + 1;

    // One-step adjacency: cost 1 iff any edge p -> q exists (the label is free to choose when
    // inserting), 0 on the diagonal. Closed under Floyd-Warshall this gives the cheapest
    // number of insertions moving from p to q.
    let mut graph = vec![vec![cap; m]; m];
    for p in 0..m {
        for t in nfa.transitions_from(p) {
            graph[p][t.to] = 1;
        }
        graph[p][p] = 0;
    }
    for via in 0..m {
        for p in 0..m {
            for q in 0..m {
                let through = graph[p][via].saturating_add(graph[via][q]);
                if through < graph[p][q] {
                    graph[p][q] = through;
                }
            }
        }
    }

    // Base case: the empty prefix reaches q with as many insertions as the cheapest path from
    // any initial state.
    let mut previous = vec![cap; m];
    for q in nfa.initial_states().iter() {
        for j in 0..m {
            previous[j] = previous[j].min(graph[q][j]);
        }
    }

    let mut current = vec![cap; m];
    for i in 1..=n {
        let Some(symbol) = word.nth(i - 1) else {
            break;
        };
        current.iter_mut().for_each(|d| *d = cap);
        for q in 0..m {
            // deletion of the i-th letter
            current[q] = current[q].min(previous[q].saturating_add(1));
            for p in 0..m {
                for t in nfa.transitions_from(p).iter().filter(|t| t.to == q) {
                    if t.label == symbol {
                        // the letter matches an existing transition
                        current[q] = current[q].min(previous[p]);
                    }
                    // substitution by whatever label the edge carries
                    current[q] = current[q].min(previous[p].saturating_add(1));
                }
            }
        }
        // close under insertions within the same row
        for q in 0..m {
            for p in 0..m {
                current[q] = current[q].min(current[p].saturating_add(graph[p][q]));
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let mut best = n;
    for q in nfa.final_states().iter() {
        best = best.min(previous[q]);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::edit_distance;
    use crate::Nfa;

    /// Automaton for (ab)* over {a, b}.
    fn ab_star() -> Nfa<char> {
        let mut nfa = Nfa::with_states(2);
        nfa.add_transition(0, 'a', 1).unwrap();
        nfa.add_transition(1, 'b', 0).unwrap();
        nfa.set_initial(0).unwrap();
        nfa.set_final(0).unwrap();
        nfa
    }

    #[test]
    fn members_have_distance_zero() {
        let nfa = ab_star();
        assert_eq!(edit_distance(&"", &nfa), 0);
        assert_eq!(edit_distance(&"ab", &nfa), 0);
        assert_eq!(edit_distance(&"abab", &nfa), 0);
    }

    #[test]
    fn single_edit_words_have_distance_one() {
        let nfa = ab_star();
        // one deletion
        assert_eq!(edit_distance(&"a", &nfa), 1);
        assert_eq!(edit_distance(&"aab", &nfa), 1);
        // one substitution
        assert_eq!(edit_distance(&"aa", &nfa), 1);
    }

    #[test]
    fn far_word_distance_grows_linearly() {
        let nfa = ab_star();
        // a^2k needs k substitutions
        assert_eq!(edit_distance(&"aaaaaa", &nfa), 3);
        let mut word = vec!['a'; 100];
        word.extend(std::iter::repeat('b').take(100));
        let d = edit_distance(&word, &nfa);
        assert!(d >= 90, "a^100 b^100 should be far from (ab)*, got {d}");
    }

    #[test]
    fn empty_language_is_capped_at_word_length() {
        let mut nfa: Nfa<char> = Nfa::with_states(2);
        nfa.add_transition(0, 'a', 0).unwrap();
        nfa.set_initial(0).unwrap();
        nfa.set_final(1).unwrap(); // unreachable
        assert_eq!(edit_distance(&"aaa", &nfa), 3);
    }

    #[test]
    fn modular_length_language() {
        // words of length 5i + 2: distance is the number of letters to delete or insert
        let mut nfa = Nfa::with_states(5);
        for i in 0..5 {
            for c in ['0', '1'] {
                nfa.add_transition(i, c, (i + 1) % 5).unwrap();
            }
        }
        nfa.set_initial(0).unwrap();
        nfa.set_final(2).unwrap();
        assert_eq!(edit_distance(&"01", &nfa), 0);
        assert_eq!(edit_distance(&"011", &nfa), 1);
        assert_eq!(edit_distance(&"0", &nfa), 1);
        assert_eq!(edit_distance(&"0000000", &nfa), 0);
    }
}
