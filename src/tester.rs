use tracing::{debug, trace};

use crate::nfa::Nfa;
use crate::word::FiniteWord;
use crate::Symbol;

/// The error raised when [`property_test`] or [`PropertyTester::new`] is given a parameter
/// outside of `(0, 1]`. Raised before any sampling or simulation work is performed.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// The distance fraction `eps` must lie in `(0, 1]`.
    #[error("eps must lie in (0, 1], got {0}")]
    Eps(f64),
    /// The error probability must lie in `(0, 1]`.
    #[error("error_proba must lie in (0, 1], got {0}")]
    ErrorProba(f64),
}

/// A contiguous slice of the input word, drawn at a random start offset. Fragments are created
/// fresh for every test invocation, consumed once by the blocking merge and never mutated.
#[derive(Debug, Clone)]
struct Fragment<S> {
    start: usize,
    symbols: Vec<S>,
}

impl<S> Fragment<S> {
    fn end(&self) -> usize {
        self.start + self.symbols.len()
    }
}

/// Sampling parameters derived from the automaton and the requested guarantees.
#[derive(Debug, Clone, Copy)]
struct Parameters {
    beta: f64,
    gamma: usize,
    threshold: usize,
    /// `ln(6 k 2^k / error_proba)`, kept in log space so large component counts cannot
    /// overflow.
    log_union_bound: f64,
}

impl Parameters {
    fn derive(num_states: usize, num_scc: usize, eps: f64, error_proba: f64, threshold_factor: f64) -> Self {
        let k = num_scc as f64;
        let beta = eps / (6.0 * num_states as f64);
        let gamma = (2.0 / beta).ceil() as usize;
        let log_gamma = (gamma as f64).ln().ceil();
        let threshold = f64::max(
            threshold_factor * gamma as f64 * log_gamma,
            (k / beta).ceil(),
        ) as usize;
        let log_union_bound = (6.0 * k / error_proba).ln() + k * std::f64::consts::LN_2;
        Self {
            beta,
            gamma,
            threshold,
            log_union_bound,
        }
    }
}

/// A reusable, seedable property tester for regular languages.
///
/// The tester carries the target distance fraction `eps`, the error probability and its own
/// random generator. Both parameters are validated once, at construction. The generator is an
/// explicit [`fastrand::Rng`] instance, so two testers never share hidden state and a seeded
/// tester is fully reproducible.
///
/// Testing a member of the language returns `true` on every draw; testing a word at edit
/// distance at least `eps * n` from the language returns `false` with probability at least
/// `1 - error_proba`. In between, either verdict may be returned.
///
/// # Example
/// ```
/// use regularity::prelude::*;
///
/// let mut nfa = Nfa::with_states(2);
/// nfa.add_transition(0, 'a', 1).unwrap();
/// nfa.add_transition(1, 'b', 0).unwrap();
/// nfa.set_initial(0).unwrap();
/// nfa.set_final(0).unwrap();
///
/// let mut tester = PropertyTester::new(0.5, 0.3).unwrap().with_seed(7);
/// assert!(tester.test(&mut nfa, &"abababab"));
/// ```
#[derive(Debug, Clone)]
pub struct PropertyTester {
    eps: f64,
    error_proba: f64,
    threshold_factor: f64,
    rng: fastrand::Rng,
}

impl PropertyTester {
    /// Creates a tester for distance fraction `eps` and error probability `error_proba`, both
    /// required to lie in `(0, 1]`. The generator is seeded from entropy; use
    /// [`with_seed`][PropertyTester::with_seed] for reproducible runs.
    pub fn new(eps: f64, error_proba: f64) -> Result<Self, ParameterError> {
        if !(eps > 0.0 && eps <= 1.0) {
            return Err(ParameterError::Eps(eps));
        }
        if !(error_proba > 0.0 && error_proba <= 1.0) {
            return Err(ParameterError::ErrorProba(error_proba));
        }
        Ok(Self {
            eps,
            error_proba,
            threshold_factor: DEFAULT_THRESHOLD_FACTOR,
            rng: fastrand::Rng::new(),
        })
    }

    /// Replaces the random generator with one seeded from `seed`, making every subsequent
    /// verdict reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Overrides the constant `c` in the short-input threshold
    /// `max(c * gamma * ceil(ln gamma), ceil(k / beta))`. The default is
    /// [`DEFAULT_THRESHOLD_FACTOR`]; larger values route more inputs to exact simulation.
    pub fn with_threshold_factor(mut self, factor: f64) -> Self {
        self.threshold_factor = factor;
        self
    }

    /// Runs the tester on `word`. Takes the automaton mutably because the SCC count may have
    /// to be (re)computed and cached; call [`Nfa::freeze`] beforehand if that is undesirable.
    pub fn test<S: Symbol, W: FiniteWord<Symbol = S> + ?Sized>(
        &mut self,
        nfa: &mut Nfa<S>,
        word: &W,
    ) -> bool {
        let n = word.len();
        let k = nfa.num_scc();
        let m = nfa.num_states();
        let params = Parameters::derive(m, k, self.eps, self.error_proba, self.threshold_factor);
        debug!(
            n,
            k,
            m,
            beta = params.beta,
            gamma = params.gamma,
            threshold = params.threshold,
            "derived sampling parameters"
        );

        if n < params.threshold.max(1) {
            trace!("input below sampling threshold, simulating exactly");
            return nfa.accepts(word);
        }

        let fragments = self.draw_fragments(word, n, &params);
        !is_blocking(fragments, nfa, n)
    }

    /// Draws the randomized fragment multiset: `lambda` unit-length fragments plus, for every
    /// doubling level `i < ceil(log2 gamma)`, `alpha_i` fragments of length `2^(i+1)`. All
    /// start offsets are independent and uniform in `[0, n)`; content reaching past the end of
    /// the word is clamped. The number of fragments depends on the automaton and the
    /// guarantees, but not on `n`.
    fn draw_fragments<S: Symbol, W: FiniteWord<Symbol = S> + ?Sized>(
        &mut self,
        word: &W,
        n: usize,
        params: &Parameters,
    ) -> Vec<Fragment<S>> {
        let mut fragments = Vec::new();

        let lambda = (2.0 * params.log_union_bound / params.beta).ceil() as usize;
        for _ in 0..lambda {
            let start = self.rng.usize(..n);
            fragments.push(materialize(word, n, start, 1));
        }

        let log_gamma = (params.gamma as f64).ln().ceil();
        let levels = (params.gamma as f64).log2().ceil() as u32;
        for i in 0..levels {
            let l = 1usize << i;
            let alpha = (3.0 * params.log_union_bound * params.gamma as f64 * log_gamma
                / l as f64)
                .ceil() as usize;
            for _ in 0..alpha {
                let start = self.rng.usize(..n);
                fragments.push(materialize(word, n, start, 2 * l));
            }
        }

        trace!(count = fragments.len(), lambda, levels, "drew fragment multiset");
        fragments
    }
}

/// Default constant in the short-input threshold. The underlying analysis exists in two
/// variants, one with constant `3` for multi-letter fragments and one with constant `12`; this
/// follows the former and can be overridden with
/// [`PropertyTester::with_threshold_factor`].
pub const DEFAULT_THRESHOLD_FACTOR: f64 = 3.0;

/// Copies the slice `[start, start + len)` of the word into a fragment, clamped to the valid
/// input range.
fn materialize<S: Symbol, W: FiniteWord<Symbol = S> + ?Sized>(
    word: &W,
    n: usize,
    start: usize,
    len: usize,
) -> Fragment<S> {
    let end = usize::min(start + len, n);
    let mut symbols = Vec::with_capacity(end - start);
    for position in start..end {
        match word.nth(position) {
            Some(symbol) => symbols.push(symbol),
            None => break,
        }
    }
    Fragment { start, symbols }
}

/// Merges the fragment multiset into an over-approximation of the set of states reachable
/// across the whole input and reports whether it is *blocking*, i.e. contains no final state.
///
/// Fragments are processed in order of their start offset. A gap of unobserved letters is
/// accounted for by a single [`Nfa::star_reach`] call (one call suffices for any gap length
/// since the closure is idempotent); observed letters apply [`Nfa::letter_reach`] one by one.
/// Overlapping or colliding fragments only change which states get explored, never the
/// statistical guarantee.
fn is_blocking<S: Symbol>(mut fragments: Vec<Fragment<S>>, nfa: &Nfa<S>, n: usize) -> bool {
    fragments.sort_by_key(|fragment| fragment.start);

    let mut reachable = nfa.initial_states().clone();
    let mut pos = 0;
    let mut next = 0;
    while pos < n {
        let Some(fragment) = fragments.get(next) else {
            // the entire unobserved suffix is unconstrained
            reachable = nfa.star_reach(&reachable);
            break;
        };
        if pos < fragment.start {
            reachable = nfa.star_reach(&reachable);
            pos = fragment.start;
        } else if pos < fragment.end() {
            reachable = nfa.letter_reach(&reachable, &fragment.symbols[pos - fragment.start]);
            pos += 1;
        } else {
            next += 1;
        }
    }

    let blocking = reachable.is_disjoint(nfa.final_states());
    trace!(blocking, "merged fragments into reachable set");
    blocking
}

/// One-shot `eps`-property test of `word` against the language of `nfa`.
///
/// Returns `Ok(true)` whenever `word` belongs to the language, on any random draw. If the edit
/// distance of `word` to the language is at least `eps * n`, returns `Ok(false)` with
/// probability at least `1 - error_proba`. For distances strictly between `0` and `eps * n`,
/// either verdict may be returned. Inputs shorter than the derived threshold are decided
/// exactly by [`Nfa::accepts`].
///
/// Fails with [`ParameterError`] if `eps` or `error_proba` lies outside `(0, 1]`, before any
/// work is done. The randomness is seeded from entropy; construct a [`PropertyTester`] with
/// [`PropertyTester::with_seed`] for reproducible verdicts.
pub fn property_test<S: Symbol, W: FiniteWord<Symbol = S> + ?Sized>(
    nfa: &mut Nfa<S>,
    word: &W,
    eps: f64,
    error_proba: f64,
) -> Result<bool, ParameterError> {
    Ok(PropertyTester::new(eps, error_proba)?.test(nfa, word))
}
