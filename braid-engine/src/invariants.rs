use crate::types::{BraidWord, Generator};
use nalgebra::DMatrix;
use num_complex::Complex;

/// Decision seam for group membership: does a word represent the identity
/// element of its braid group?
///
/// Dataset construction consumes this as an opaque predicate to confirm that
/// a randomly built word really is group-trivial before accepting it as a
/// sample. The rewriting core never implements group theory beyond its four
/// moves, so the decision procedure lives behind this trait.
pub trait IdentityOracle {
    /// Returns true if `word` represents the group identity.
    fn is_identity(&self, word: &BraidWord) -> bool;
}

/// Incremental braid-word fingerprint.
///
/// Tiered strategy:
/// - Tier 1: Instant (integer arithmetic only) — writhe
/// - Tier 2: Fast (linear algebra) — unreduced Burau representation
#[derive(Debug, Clone)]
pub struct BurauState {
    /// Net crossing sign: +1 per overcrossing, -1 per undercrossing.
    writhe: i32,
    /// Burau matrix representation (N x N, where N is the strand count).
    matrix: DMatrix<Complex<f64>>,
    /// Complex parameter t for the Burau representation (e^(i * 1.0)).
    t_param: Complex<f64>,
    dimension: usize,
}

impl BurauState {
    /// Creates a fresh state with the Burau matrix at identity.
    ///
    /// # Arguments
    /// * `dimension` - strand count of the words this state fingerprints
    pub fn new(dimension: usize) -> Self {
        // t = e^(i * 1.0): a point on the unit circle away from the roots
        // of unity where the representation degenerates.
        let t_param = Complex::new(1.0_f64.cos(), 1.0_f64.sin());

        BurauState {
            writhe: 0,
            matrix: DMatrix::identity(dimension, dimension),
            t_param,
            dimension,
        }
    }

    /// Fingerprints a whole word at once.
    pub fn of_word(word: &BraidWord) -> Self {
        let mut state = BurauState::new(word.n_strands());
        for gen in word.iter() {
            state.update(gen);
        }
        state
    }

    /// Returns the strand count this state was built for.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the net crossing sign accumulated so far.
    ///
    /// All four rewriting moves preserve writhe, and the empty word has
    /// writhe 0, so a nonzero writhe proves a word is not the identity.
    pub fn writhe(&self) -> i32 {
        self.writhe
    }

    /// Magnitude of the Burau matrix trace — a scalar complexity signal.
    pub fn trace_magnitude(&self) -> f64 {
        let trace = self.matrix.diagonal().iter().sum::<Complex<f64>>();
        trace.norm()
    }

    /// True if the Burau matrix is within `tolerance` of the identity in
    /// max-norm. Accumulated floating point error grows with word length,
    /// so the tolerance must not be too tight.
    pub fn is_near_identity(&self, tolerance: f64) -> bool {
        let identity = DMatrix::identity(self.dimension, self.dimension);
        let diff = &self.matrix - &identity;
        diff.iter().all(|c| c.norm() <= tolerance)
    }

    /// Updates the fingerprint with one generator.
    ///
    /// Updates:
    /// - writhe: +1 for Sigma (overcrossing), -1 for InverseSigma
    /// - Burau matrix: multiplied by the generator matrix U_k or U_k^{-1}
    pub fn update(&mut self, gen: &Generator) {
        match gen {
            Generator::Sigma(k) => {
                self.writhe += 1;
                self.apply_sigma_matrix(*k);
            }
            Generator::InverseSigma(k) => {
                self.writhe -= 1;
                self.apply_inverse_sigma_matrix(*k);
            }
        }
    }

    /// Applies the generator matrix U_k for σ_k.
    ///
    /// U_k is the identity except for the 2x2 block at indices (k-1, k):
    /// [1-t  t ]
    /// [1    0 ]
    ///
    /// k is 1-based, so the block sits at 0-based rows/columns k-1 and k.
    fn apply_sigma_matrix(&mut self, k: usize) {
        if k == 0 || k >= self.dimension {
            return; // Invalid generator index
        }

        let mut u_k = DMatrix::identity(self.dimension, self.dimension);

        let i = k - 1;
        let j = k;

        u_k[(i, i)] = Complex::new(1.0, 0.0) - self.t_param; // 1 - t
        u_k[(i, j)] = self.t_param; // t
        u_k[(j, i)] = Complex::new(1.0, 0.0); // 1
        u_k[(j, j)] = Complex::new(0.0, 0.0); // 0

        self.matrix = &self.matrix * &u_k;
    }

    /// Applies the inverse generator matrix U_k^{-1} for σ_k^{-1}.
    ///
    /// U_k^{-1} is the identity except for the 2x2 block at (k-1, k):
    /// [0     1      ]
    /// [1/t   1 - 1/t]
    fn apply_inverse_sigma_matrix(&mut self, k: usize) {
        if k == 0 || k >= self.dimension {
            return; // Invalid generator index
        }

        let mut u_k_inv = DMatrix::identity(self.dimension, self.dimension);

        let i = k - 1;
        let j = k;

        let one_over_t = Complex::new(1.0, 0.0) / self.t_param;

        u_k_inv[(i, i)] = Complex::new(0.0, 0.0); // 0
        u_k_inv[(i, j)] = Complex::new(1.0, 0.0); // 1
        u_k_inv[(j, i)] = one_over_t; // 1/t
        u_k_inv[(j, j)] = Complex::new(1.0, 0.0) - one_over_t; // 1 - 1/t

        self.matrix = &self.matrix * &u_k_inv;
    }
}

/// Identity oracle backed by the Burau representation.
///
/// Checks tier-wise: the writhe must be zero (exact integer arithmetic),
/// then the Burau matrix of the word must be within `tolerance` of the
/// identity. The unreduced Burau representation is unfaithful for five or
/// more strands, so this is a heuristic acceptor rather than a decision
/// procedure; the random word builder only composes identity-preserving
/// moves, so everything it submits here is trivial by construction and the
/// oracle serves as a confirmation gate.
#[derive(Debug, Clone)]
pub struct BurauOracle {
    dimension: usize,
    tolerance: f64,
}

impl BurauOracle {
    /// Default max-norm tolerance. Each generator multiplication compounds
    /// rounding error, so this sits well above f64 epsilon while staying far
    /// below the norm gap of any non-identity Burau image seen in practice.
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    /// Creates an oracle for words on `n_strands` strands.
    pub fn new(n_strands: usize) -> Self {
        BurauOracle {
            dimension: n_strands,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Overrides the identity-comparison tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl IdentityOracle for BurauOracle {
    fn is_identity(&self, word: &BraidWord) -> bool {
        if word.n_strands() != self.dimension {
            return false;
        }
        let state = BurauState::of_word(word);
        state.writhe() == 0 && state.is_near_identity(self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = BurauState::new(4);
        assert_eq!(state.writhe(), 0);
        assert_eq!(state.dimension(), 4);
        assert!(state.is_near_identity(1e-12));
    }

    #[test]
    fn test_update_tracks_writhe() {
        let mut state = BurauState::new(4);
        state.update(&Generator::Sigma(1));
        state.update(&Generator::Sigma(2));
        state.update(&Generator::InverseSigma(1));
        assert_eq!(state.writhe(), 1); // +1 +1 -1
        assert!(!state.is_near_identity(1e-6));
    }

    #[test]
    fn test_of_word_matches_incremental_updates() {
        let word = BraidWord::from_ints(4, &[1, -3, 2]).unwrap();
        let state = BurauState::of_word(&word);

        let mut incremental = BurauState::new(4);
        for gen in word.iter() {
            incremental.update(gen);
        }
        assert_eq!(state.writhe(), incremental.writhe());
        assert_eq!(state.trace_magnitude(), incremental.trace_magnitude());
    }

    #[test]
    fn test_sigma_inverse_cancellation() {
        // σ_1 · σ_1^{-1} returns to identity up to floating point error.
        let mut state = BurauState::new(4);
        state.update(&Generator::Sigma(1));
        state.update(&Generator::InverseSigma(1));
        assert!(
            state.is_near_identity(1e-10),
            "matrix should return to identity after cancellation"
        );
    }

    #[test]
    fn test_oracle_accepts_empty_word() {
        let oracle = BurauOracle::new(3);
        assert!(oracle.is_identity(&BraidWord::new(3)));
    }

    #[test]
    fn test_oracle_accepts_canceling_pairs() {
        let oracle = BurauOracle::new(3);
        let word = BraidWord::from_ints(3, &[1, 2, -2, -1]).unwrap();
        assert!(oracle.is_identity(&word));
    }

    #[test]
    fn test_oracle_rejects_single_generator() {
        let oracle = BurauOracle::new(3);
        let word = BraidWord::from_ints(3, &[1]).unwrap();
        assert!(!oracle.is_identity(&word), "writhe 1 can never be identity");
    }

    #[test]
    fn test_oracle_tolerance_is_configurable() {
        // A looser tolerance still separates trivial words from the
        // order-one entry gap of non-identity Burau images.
        let oracle = BurauOracle::new(3).with_tolerance(1e-3);
        let trivial = BraidWord::from_ints(3, &[2, -2]).unwrap();
        let nontrivial = BraidWord::from_ints(3, &[1, -2]).unwrap();
        assert!(oracle.is_identity(&trivial));
        assert!(!oracle.is_identity(&nontrivial));
    }

    #[test]
    fn test_oracle_rejects_zero_writhe_non_identity() {
        // [1, -2] has writhe 0 but is not the identity; the matrix tier
        // must catch it.
        let oracle = BurauOracle::new(3);
        let word = BraidWord::from_ints(3, &[1, -2]).unwrap();
        assert!(!oracle.is_identity(&word));
    }

    #[test]
    fn test_oracle_accepts_nested_insertions() {
        // Nested canceling-pair insertions keep the word group-trivial.
        let oracle = BurauOracle::new(3);
        let mut word = BraidWord::new(3);
        assert!(word.apply_insert_pair(0, Generator::Sigma(1)));
        assert!(word.apply_insert_pair(1, Generator::Sigma(2)));
        assert_eq!(word.as_ints(), vec![1, 2, -2, -1]);
        assert!(oracle.is_identity(&word));
    }
}
