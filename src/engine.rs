//! Iterative refinement loop over the peer matrix.
//!
//! Each iteration visits the topmost non-stable row. An aligned row is
//! stable; an unaligned row gets a swarm of particles (one per distinct
//! symbol in the row), every unsettled particle explores its fly-down
//! candidates, and the best candidate is committed iff it strictly improves
//! the row's objective. A commit shifts cells within columns and can change
//! the classification of every other row's window, so all row states and
//! particles are rebuilt from scratch after it.
//!
//! The loop ends at a global fixed point (every row stable) or when the
//! iteration bound runs out; the matrix produced so far is returned either
//! way, with a termination flag saying which happened.

use std::collections::HashMap;

use crate::error::AlignError;
use crate::matrix::{Cell, PeerMatrix};
use crate::scoring::{self, Weights};
use crate::swarm::{self, Candidate, Particle};
use crate::utils::{default_iteration_bound, DEFAULT_STALL_THRESHOLD};

/// How the refinement loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every row is stable: no gap insertion improves the objective.
    Converged,
    /// The iteration bound ran out first; the matrix is best-effort.
    BoundExceeded,
}

/// Result of a refinement run.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// The matrix after the loop terminated.
    pub matrix: PeerMatrix,
    pub termination: Termination,
    /// Row visits performed.
    pub iterations: usize,
    /// Gap insertions committed.
    pub shifts: usize,
}

impl Alignment {
    /// Whether the run reached a true fixed point.
    pub fn converged(&self) -> bool {
        matches!(self.termination, Termination::Converged)
    }

    /// Strict form: a bound-exceeded run becomes a
    /// [`NonConvergence`](AlignError::NonConvergence) error still carrying
    /// the best-effort alignment.
    pub fn into_converged(self) -> Result<Self, AlignError> {
        match self.termination {
            Termination::Converged => Ok(self),
            Termination::BoundExceeded => Err(AlignError::NonConvergence {
                bound: self.iterations,
                alignment: Box::new(self),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    Pending,
    InProgress,
    Stable,
}

/// Drives a [`PeerMatrix`] toward a stable alignment.
///
/// Typical usage:
/// ```
/// use peer_align::{AlignmentEngine, PeerMatrix};
///
/// let matrix = PeerMatrix::from_sequences(&["ab", "b"]).unwrap();
/// let alignment = AlignmentEngine::new(matrix).run().unwrap();
/// assert!(alignment.converged());
/// assert_eq!(alignment.matrix.to_string(), "a-\nbb");
/// ```
pub struct AlignmentEngine {
    matrix: PeerMatrix,
    weights: Weights,
    max_iterations: usize,
    stall_threshold: u32,
    lookahead: Option<usize>,
}

impl AlignmentEngine {
    /// Create an engine with heuristic defaults for the iteration bound and
    /// stall threshold, and an objective window spanning the whole matrix.
    pub fn new(matrix: PeerMatrix) -> Self {
        let bound = default_iteration_bound(matrix.rows(), matrix.columns());
        Self::with_config(
            matrix,
            Weights::default(),
            bound,
            DEFAULT_STALL_THRESHOLD,
            None,
        )
    }

    pub(crate) fn with_config(
        matrix: PeerMatrix,
        weights: Weights,
        max_iterations: usize,
        stall_threshold: u32,
        lookahead: Option<usize>,
    ) -> Self {
        Self {
            matrix,
            weights,
            max_iterations,
            stall_threshold,
            lookahead,
        }
    }

    /// Expose the matrix in its current state.
    pub fn matrix(&self) -> &PeerMatrix {
        &self.matrix
    }

    /// Run the refinement to a fixed point or the iteration bound.
    ///
    /// Fails up front with the `InvalidInput` taxonomy if the matrix is
    /// malformed (ragged columns). Hitting the bound is not an error here:
    /// the returned [`Alignment`] carries the termination flag, and
    /// [`Alignment::into_converged`] upgrades it for strict callers.
    pub fn run(mut self) -> Result<Alignment, AlignError> {
        self.matrix.check_consistent()?;

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "align_run",
            rows = self.matrix.rows(),
            columns = self.matrix.columns()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut states = vec![RowState::Pending; self.matrix.rows()];
        let mut particles: HashMap<(usize, char), Particle> = HashMap::new();
        let mut iterations = 0usize;
        let mut shifts = 0usize;

        loop {
            let Some(r) = states.iter().position(|s| *s != RowState::Stable) else {
                return Ok(Alignment {
                    matrix: self.matrix,
                    termination: Termination::Converged,
                    iterations,
                    shifts,
                });
            };
            if iterations >= self.max_iterations {
                return Ok(Alignment {
                    matrix: self.matrix,
                    termination: Termination::BoundExceeded,
                    iterations,
                    shifts,
                });
            }
            iterations += 1;

            #[cfg(feature = "tracing")]
            let row_span = tracing::trace_span!("row_visit", row = r, iteration = iterations);
            #[cfg(feature = "tracing")]
            let _row_guard = row_span.enter();

            let row_cells = self.matrix.row_cells(r);
            if scoring::aligned(&row_cells) {
                states[r] = RowState::Stable;
                continue;
            }
            states[r] = RowState::InProgress;

            let end = self.lookahead.map(|k| r + k);
            let baseline = scoring::objective_with(&self.matrix, r, end, &self.weights);

            let mut best: Option<Candidate> = None;
            let mut all_settled = true;
            for value in distinct_symbols(&row_cells) {
                let particle = particles
                    .entry((r, value))
                    .or_insert_with(|| Particle::new(&self.matrix, value, r));
                if particle.settled(self.stall_threshold) {
                    continue;
                }
                all_settled = false;
                let candidate = particle.explore(&self.matrix, self.lookahead, &self.weights);
                if let Some(c) = candidate {
                    // Strict comparison keeps ties on the earlier symbol.
                    if best.as_ref().map_or(true, |b| c.score > b.score) {
                        best = Some(c);
                    }
                }
            }

            match best {
                Some(c) if c.score > baseline => {
                    #[cfg(feature = "tracing")]
                    let commit_span = tracing::trace_span!(
                        "commit_shift",
                        row = r,
                        target_row = c.target_row,
                        score = c.score,
                        baseline
                    );
                    #[cfg(feature = "tracing")]
                    let _commit_guard = commit_span.enter();

                    swarm::apply_shift(&mut self.matrix, r, c.target_row, &c.columns);
                    debug_assert!(self.matrix.check_consistent().is_ok());
                    shifts += 1;

                    // A shift moves every row below it and changes the
                    // objective window of every row above it.
                    states = vec![RowState::Pending; self.matrix.rows()];
                    particles.clear();
                }
                _ => {
                    if all_settled {
                        states[r] = RowState::Stable;
                    }
                }
            }
        }
    }
}

/// Distinct non-gap symbols of a row, in first-occurrence order.
fn distinct_symbols(row: &[Cell]) -> Vec<char> {
    let mut symbols = Vec::new();
    for cell in row {
        if let Cell::Symbol(s) = *cell {
            if !symbols.contains(&s) {
                symbols.push(s);
            }
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(seqs: &[&str]) -> PeerMatrix {
        PeerMatrix::from_sequences(seqs).unwrap()
    }

    #[test]
    fn aligns_two_sequences_with_one_shift() {
        let alignment = AlignmentEngine::new(matrix(&["ab", "b"])).run().unwrap();
        assert!(alignment.converged());
        assert_eq!(alignment.shifts, 1);
        assert_eq!(alignment.matrix.to_string(), "a-\nbb");
    }

    #[test]
    fn already_aligned_input_commits_nothing() {
        let alignment = AlignmentEngine::new(matrix(&["abc", "abc"])).run().unwrap();
        assert!(alignment.converged());
        assert_eq!(alignment.shifts, 0);
        assert_eq!(alignment.iterations, 3);
        assert_eq!(alignment.matrix.to_string(), "aa\nbb\ncc");
    }

    #[test]
    fn zero_bound_exceeds_immediately() {
        let m = matrix(&["ab", "b"]);
        let engine = AlignmentEngine::with_config(
            m.clone(),
            Weights::default(),
            0,
            DEFAULT_STALL_THRESHOLD,
            None,
        );
        let alignment = engine.run().unwrap();
        assert_eq!(alignment.termination, Termination::BoundExceeded);
        assert_eq!(alignment.iterations, 0);
        assert_eq!(alignment.shifts, 0);
        assert_eq!(alignment.matrix, m);
    }

    #[test]
    fn into_converged_reports_non_convergence() {
        let engine = AlignmentEngine::with_config(
            matrix(&["ab", "b"]),
            Weights::default(),
            0,
            DEFAULT_STALL_THRESHOLD,
            None,
        );
        let alignment = engine.run().unwrap();
        match alignment.into_converged() {
            Err(AlignError::NonConvergence { bound, alignment }) => {
                assert_eq!(bound, 0);
                assert_eq!(alignment.matrix.columns(), 2);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn distinct_symbols_in_first_occurrence_order() {
        let row = vec![
            Cell::Symbol('b'),
            Cell::Symbol('c'),
            Cell::Gap,
            Cell::Symbol('b'),
        ];
        assert_eq!(distinct_symbols(&row), vec!['b', 'c']);
    }
}
