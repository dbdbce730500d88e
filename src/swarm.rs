//! Per-symbol local search: positions, particles and candidate shifts.
//!
//! A particle tracks one symbol value within one row and explores "fly down"
//! moves: since gap insertion can only push cells deeper, a row is aligned on
//! a symbol by shifting the row's current occurrences down to a row where the
//! remaining columns already hold that symbol. Each candidate target depth is
//! scored on a scratch copy of the matrix via the objective; the particle
//! remembers the best position/score pair it has seen.
//!
//! Despite the swarm vocabulary inherited from the heuristic's lineage, the
//! search is deterministic and sequential: no randomness, no population
//! dynamics.

use crate::matrix::{Cell, PeerMatrix};
use crate::scoring::{objective_with, Weights};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where a symbol value occurs within one row: the row index plus every
/// column index holding that value there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub columns: Vec<usize>,
}

/// Scan row `row` and return the [`Position`] of `value` there. The column
/// list is empty when the value is absent from the row.
pub fn locate(matrix: &PeerMatrix, value: char, row: usize) -> Position {
    let columns = (0..matrix.columns())
        .filter(|&c| matrix.cell(row, c) == Cell::Symbol(value))
        .collect();
    Position { row, columns }
}

/// A candidate shift: insert `target_row - position row` gaps at the top of
/// the move in each listed column, sliding that symbol down to `target_row`.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub value: char,
    pub row: usize,
    pub target_row: usize,
    pub columns: Vec<usize>,
    pub score: f64,
}

/// Deterministic search unit for one symbol value within one row.
///
/// `updated` counts consecutive engine visits that left `best` unchanged;
/// past the engine's stall threshold the particle is considered settled and
/// skipped. Particles never outlive a matrix mutation, so a skipped
/// evaluation is always identical to the one that preceded it.
#[derive(Debug, Clone)]
pub struct Particle {
    pub value: char,
    pub updated: u32,
    pub position: Position,
    pub best: Option<Position>,
    pub best_score: f64,
}

impl Particle {
    /// Create a particle for `value` anchored at `row` of `matrix`.
    pub fn new(matrix: &PeerMatrix, value: char, row: usize) -> Self {
        Self {
            value,
            updated: 0,
            position: locate(matrix, value, row),
            best: None,
            best_score: f64::NEG_INFINITY,
        }
    }

    /// Whether the particle's best position has gone unimproved for more
    /// than `stall_threshold` visits.
    pub fn settled(&self, stall_threshold: u32) -> bool {
        self.updated > stall_threshold
    }

    /// Explore every candidate fly-down move for this particle and return
    /// the best-scoring one, if any column below offers a target.
    ///
    /// Updates the particle's best position/score and the stall counter as a
    /// side effect.
    pub(crate) fn explore(
        &mut self,
        matrix: &PeerMatrix,
        lookahead: Option<usize>,
        weights: &Weights,
    ) -> Option<Candidate> {
        let row = self.position.row;
        let holders = &self.position.columns;
        if holders.is_empty() {
            self.updated += 1;
            return None;
        }

        let last = matrix.rows().saturating_sub(1);
        let window_end = lookahead.map_or(last, |k| (row + k).min(last));

        // Target depths: first occurrence of the value below this row in
        // each column that does not hold it here. Deduplicated, in column
        // order, so exploration stays deterministic.
        let mut targets: Vec<usize> = Vec::new();
        for col in 0..matrix.columns() {
            if holders.contains(&col) {
                continue;
            }
            if let Some(d) = matrix.find_below(self.value, row, col, window_end) {
                if !targets.contains(&d) {
                    targets.push(d);
                }
            }
        }

        let scored = score_targets(matrix, row, holders, &targets, lookahead, weights);

        let mut candidate: Option<Candidate> = None;
        for (target_row, score) in scored {
            if candidate.as_ref().map_or(true, |c| score > c.score) {
                candidate = Some(Candidate {
                    value: self.value,
                    row,
                    target_row,
                    columns: holders.clone(),
                    score,
                });
            }
        }

        match &candidate {
            Some(c) if c.score > self.best_score => {
                self.best_score = c.score;
                self.best = Some(Position {
                    row: c.target_row,
                    columns: c.columns.clone(),
                });
                self.updated = 0;
            }
            _ => self.updated += 1,
        }

        candidate
    }
}

/// Apply a fly-down shift to `matrix`: insert gaps in every holder column so
/// the value slides from `row` to `target_row`, then renormalize.
pub(crate) fn apply_shift(matrix: &mut PeerMatrix, row: usize, target_row: usize, columns: &[usize]) {
    debug_assert!(target_row > row);
    for &col in columns {
        matrix.insert_gaps(col, row, target_row - row);
    }
    matrix.normalize();
}

fn score_one(
    matrix: &PeerMatrix,
    row: usize,
    target_row: usize,
    holders: &[usize],
    lookahead: Option<usize>,
    weights: &Weights,
) -> f64 {
    let mut scratch = matrix.clone();
    apply_shift(&mut scratch, row, target_row, holders);
    let end = lookahead.map(|k| row + k);
    objective_with(&scratch, row, end, weights)
}

#[cfg(feature = "parallel")]
fn score_targets(
    matrix: &PeerMatrix,
    row: usize,
    holders: &[usize],
    targets: &[usize],
    lookahead: Option<usize>,
    weights: &Weights,
) -> Vec<(usize, f64)> {
    targets
        .par_iter()
        .map(|&d| (d, score_one(matrix, row, d, holders, lookahead, weights)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_targets(
    matrix: &PeerMatrix,
    row: usize,
    holders: &[usize],
    targets: &[usize],
    lookahead: Option<usize>,
    weights: &Weights,
) -> Vec<(usize, f64)> {
    targets
        .iter()
        .map(|&d| (d, score_one(matrix, row, d, holders, lookahead, weights)))
        .collect()
}
