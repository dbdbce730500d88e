use crate::engine::AlignmentEngine;
use crate::matrix::PeerMatrix;
use crate::scoring::Weights;
use crate::utils::{default_iteration_bound, DEFAULT_STALL_THRESHOLD};

pub struct AlignmentEngineBuilder {
    matrix: PeerMatrix,
    weights: Weights,
    max_iterations: Option<usize>,
    stall_threshold: u32,
    lookahead: Option<usize>,
}

impl AlignmentEngineBuilder {
    pub fn new(matrix: PeerMatrix) -> Self {
        Self {
            matrix,
            weights: Weights::default(),
            max_iterations: None,
            stall_threshold: DEFAULT_STALL_THRESHOLD,
            lookahead: None,
        }
    }
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
    pub fn with_stall_threshold(mut self, stall_threshold: u32) -> Self {
        self.stall_threshold = stall_threshold;
        self
    }
    /// Bound every objective window to `lookahead` rows below the row under
    /// evaluation instead of rescanning to the bottom of the matrix.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = Some(lookahead);
        self
    }
    pub fn build(self) -> AlignmentEngine {
        let bound = self.max_iterations.unwrap_or_else(|| {
            default_iteration_bound(self.matrix.rows(), self.matrix.columns())
        });
        AlignmentEngine::with_config(
            self.matrix,
            self.weights,
            bound,
            self.stall_threshold,
            self.lookahead,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_matches_engine_defaults() {
        let matrix = PeerMatrix::from_sequences(&["ab", "b"]).unwrap();
        let built = AlignmentEngineBuilder::new(matrix.clone()).build().run().unwrap();
        let direct = AlignmentEngine::new(matrix).run().unwrap();
        assert_eq!(built, direct);
    }

    #[test]
    fn explicit_bound_is_honored() {
        let matrix = PeerMatrix::from_sequences(&["ab", "b"]).unwrap();
        let alignment = AlignmentEngineBuilder::new(matrix)
            .with_max_iterations(0)
            .build()
            .run()
            .unwrap();
        assert!(!alignment.converged());
    }
}
