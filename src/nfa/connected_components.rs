use super::Transition;
use crate::Symbol;

/// Counts the strongly connected components of the transition graph with Kosaraju's algorithm.
///
/// The first pass runs a depth-first traversal over the original graph, simultaneously building
/// the transpose graph and recording the post-order finishing sequence. The second pass
/// traverses the transpose in reverse finishing order; every root that starts a new traversal
/// accounts for exactly one component.
///
/// Both passes use explicit work stacks so that automata with very many states cannot blow the
/// call stack.
pub(crate) fn kosaraju_count<S: Symbol>(
    transitions: &[Vec<Transition<S>>],
    num_states: usize,
) -> usize {
    let mut transpose: Vec<Vec<usize>> = vec![Vec::new(); num_states];
    let mut order = Vec::with_capacity(num_states);
    let mut seen = vec![false; num_states];

    // First pass: post-order over the original graph. A stack frame is a state together with
    // the index of the next out-edge to inspect; a state is finished once all its out-edges
    // have been handled. Every edge is recorded in the transpose exactly once, when its frame
    // steps over it.
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in 0..num_states {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        stack.push((root, 0));
        while let Some((state, edge)) = stack.last_mut() {
            let state = *state;
            match transitions[state].get(*edge) {
                Some(t) => {
                    *edge += 1;
                    transpose[t.to].push(state);
                    if !seen[t.to] {
                        seen[t.to] = true;
                        stack.push((t.to, 0));
                    }
                }
                None => {
                    order.push(state);
                    stack.pop();
                }
            }
        }
    }

    // Second pass: flood-fill the transpose in reverse finishing order.
    let mut seen = vec![false; num_states];
    let mut count = 0;
    let mut stack: Vec<usize> = Vec::new();
    for &root in order.iter().rev() {
        if seen[root] {
            continue;
        }
        count += 1;
        seen[root] = true;
        stack.push(root);
        while let Some(state) = stack.pop() {
            for &pred in &transpose[state] {
                if !seen[pred] {
                    seen[pred] = true;
                    stack.push(pred);
                }
            }
        }
    }

    count
}
