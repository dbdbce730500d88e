//! Row classification and the weight / objective scoring functions.
//!
//! A row is *aligned* when its non-gap cells agree on a single symbol, and
//! *full* when it is aligned with no gaps at all. Weights turn the
//! classification into a scalar in `[0, 1]`; the objective aggregates
//! weights over a row window and is what the engine maximizes when deciding
//! whether to commit a gap insertion.
//!
//! All functions here are pure: scores are recomputed on demand from the
//! current matrix state and never stored.

use crate::matrix::{Cell, PeerMatrix};

/// Weight constants `w1 < w2 < w3` for unaligned, aligned and full rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub w1: f64,
    pub w2: f64,
    pub w3: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            w1: 0.25,
            w2: 0.5,
            w3: 1.0,
        }
    }
}

/// Whether the non-gap cells of `row` agree on at most one symbol.
///
/// An all-gap row is vacuously aligned.
pub fn aligned(row: &[Cell]) -> bool {
    let mut seen: Option<char> = None;
    for cell in row {
        if let Cell::Symbol(s) = *cell {
            match seen {
                None => seen = Some(s),
                Some(t) if t != s => return false,
                _ => {}
            }
        }
    }
    true
}

/// Whether `row` is aligned and contains no gap cells.
pub fn full(row: &[Cell]) -> bool {
    aligned(row) && !row.iter().any(|c| c.is_gap())
}

/// Most frequent non-gap symbol in `row` with its occurrence count.
///
/// Ties break toward the symbol occurring first, left to right. Returns
/// `None` for an all-gap row.
pub fn most_frequent(row: &[Cell]) -> Option<(char, usize)> {
    let counts = symbol_counts(row);
    let mut best: Option<(char, usize)> = None;
    for (s, n) in counts {
        if best.map_or(true, |(_, bn)| n > bn) {
            best = Some((s, n));
        }
    }
    best
}

/// Row weight with the default constants.
pub fn weight(row: &[Cell]) -> f64 {
    weight_with(row, &Weights::default())
}

/// Row weight under explicit constants:
///
/// - full row: `w3`
/// - aligned row with gaps: `w2 * n_s / c` where `n_s` counts the repeated
///   symbol and `c` the columns
/// - unaligned row: `w1 * x / c` where `x` is the maximum occurrence count
///   of any symbol, or zero when every symbol occurs at most once
pub fn weight_with(row: &[Cell], w: &Weights) -> f64 {
    let cols = row.len() as f64;
    if full(row) {
        w.w3
    } else if aligned(row) {
        let n_s = row.iter().filter(|c| !c.is_gap()).count();
        w.w2 * n_s as f64 / cols
    } else {
        let max_occ = symbol_counts(row)
            .into_iter()
            .map(|(_, n)| n)
            .max()
            .unwrap_or(0);
        let x = if max_occ <= 1 { 0 } else { max_occ };
        w.w1 * x as f64 / cols
    }
}

/// Objective score of `row` with the default weights. See [`objective_with`].
pub fn objective(matrix: &PeerMatrix, row: usize, end: Option<usize>) -> f64 {
    objective_with(matrix, row, end, &Weights::default())
}

/// Objective score of `row` over the window `[row, end]`:
///
/// ```text
/// score = A(r) * C(r) / (1 + Gaps(r)) * Σ weight(row_j)   for j in [r, end]
/// ```
///
/// `A(r)` counts aligned rows in the window, `C(r)` is the best match count
/// within the current row, and `Gaps(r)` counts gaps inserted by refinement
/// (see [`PeerMatrix::interior_gaps`] — trailing padding is not penalized).
///
/// `end` defaults to the last row; passing a smaller window bounds the
/// rescanning cost when evaluating a local candidate.
pub fn objective_with(matrix: &PeerMatrix, row: usize, end: Option<usize>, w: &Weights) -> f64 {
    let last = matrix.rows().saturating_sub(1);
    let end = end.unwrap_or(last).min(last);
    debug_assert!(row <= end, "objective window is empty: {row} > {end}");

    let mut aligned_rows = 0usize;
    let mut weight_sum = 0.0;
    for r in row..=end {
        let cells = matrix.row_cells(r);
        if aligned(&cells) {
            aligned_rows += 1;
        }
        weight_sum += weight_with(&cells, w);
    }

    let matches = most_frequent(&matrix.row_cells(row)).map_or(0, |(_, n)| n);
    let gaps = matrix.interior_gaps(row, end);

    (aligned_rows as f64 * matches as f64) / (1.0 + gaps as f64) * weight_sum
}

/// Occurrence counts per distinct non-gap symbol, in first-occurrence order.
fn symbol_counts(row: &[Cell]) -> Vec<(char, usize)> {
    let mut counts: Vec<(char, usize)> = Vec::new();
    for cell in row {
        if let Cell::Symbol(s) = *cell {
            match counts.iter_mut().find(|(c, _)| *c == s) {
                Some((_, n)) => *n += 1,
                None => counts.push((s, 1)),
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::PeerMatrix;

    fn golden() -> PeerMatrix {
        PeerMatrix::from_sequences(&["abcbcdem", "acbcfg", "abchimn", "abcbcjkm"]).unwrap()
    }

    #[test]
    fn classification_golden_rows() {
        let m = golden();
        assert!(aligned(&m.row_cells(0)));
        assert!(full(&m.row_cells(0)));
        assert!(!aligned(&m.row_cells(1)));
        // Bottom row holds only 'm' and padding: aligned but not full.
        assert!(aligned(&m.row_cells(7)));
        assert!(!full(&m.row_cells(7)));
    }

    #[test]
    fn all_gap_row_is_vacuously_aligned() {
        let row = vec![Cell::Gap, Cell::Gap, Cell::Gap];
        assert!(aligned(&row));
        assert!(!full(&row));
        assert_eq!(weight(&row), 0.0);
        assert_eq!(most_frequent(&row), None);
    }

    #[test]
    fn most_frequent_golden_and_ties() {
        let m = golden();
        assert_eq!(most_frequent(&m.row_cells(1)), Some(('b', 3)));
        // Ties break toward the first symbol seen in the row.
        let row = vec![
            Cell::Symbol('x'),
            Cell::Symbol('y'),
            Cell::Symbol('y'),
            Cell::Symbol('x'),
        ];
        assert_eq!(most_frequent(&row), Some(('x', 2)));
    }

    #[test]
    fn weight_golden_rows() {
        let m = golden();
        assert_eq!(weight(&m.row_cells(0)), 1.0);
        // Unaligned, 'b' occurs 3 times over 4 columns: 0.25 * 3/4.
        assert_eq!(weight(&m.row_cells(1)), 0.1875);
        // Aligned with padding, 2 occurrences of 'm' over 4 columns.
        assert_eq!(weight(&m.row_cells(7)), 0.25);
        // Unaligned, every symbol at most once: x = 0.
        assert_eq!(weight(&m.row_cells(6)), 0.0);
    }

    #[test]
    fn weight_respects_custom_constants() {
        let m = golden();
        let w = Weights {
            w1: 0.1,
            w2: 0.2,
            w3: 0.9,
        };
        assert_eq!(weight_with(&m.row_cells(0), &w), 0.9);
        assert_eq!(weight_with(&m.row_cells(1), &w), 0.1 * 3.0 / 4.0);
    }

    #[test]
    fn objective_golden_value() {
        let m = golden();
        assert_eq!(objective(&m, 1, None), 2.625);
    }

    #[test]
    fn objective_window_restricts_lookahead() {
        let m = golden();
        // Window [1, 2]: no aligned row inside, so the score collapses.
        assert_eq!(objective(&m, 1, Some(2)), 0.0);
        // Window reaching the aligned bottom row recovers a positive score.
        assert!(objective(&m, 1, Some(7)) > 0.0);
    }
}
