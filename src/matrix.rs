//! Peer matrix: one input sequence per column, gap cells where a sequence
//! has no symbol at a row.
//!
//! The matrix is stored column-major so that a gap insertion is a single
//! `Vec` shift inside the affected column. The defining invariant: reading a
//! column top to bottom and discarding gaps reproduces the original sequence
//! exactly. Gap insertion only pushes cells down, never reorders them.

use std::fmt;

use crate::error::AlignError;

/// A single matrix cell: either a symbol from the input alphabet or a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Symbol(char),
    Gap,
}

impl Cell {
    /// The symbol carried by this cell, or `None` for a gap.
    #[inline]
    pub fn symbol(self) -> Option<char> {
        match self {
            Cell::Symbol(s) => Some(s),
            Cell::Gap => None,
        }
    }

    #[inline]
    pub fn is_gap(self) -> bool {
        matches!(self, Cell::Gap)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Symbol(s) => write!(f, "{s}"),
            Cell::Gap => write!(f, "-"),
        }
    }
}

/// A rows × columns grid of [`Cell`]s, column `c` holding input sequence `c`.
///
/// All columns have equal length in the normalized form handed to callers;
/// intermediate states during a shift are renormalized before they escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMatrix {
    columns: Vec<Vec<Cell>>,
}

impl PeerMatrix {
    /// Stack `sequences` into columns, padding shorter sequences with
    /// trailing gaps up to the longest sequence's length.
    ///
    /// Fails with the `InvalidInput` taxonomy if the batch is empty or any
    /// sequence is empty. No interior gap is inserted at this stage.
    pub fn from_sequences<S: AsRef<str>>(sequences: &[S]) -> Result<Self, AlignError> {
        if sequences.is_empty() {
            return Err(AlignError::EmptyInput);
        }
        let mut columns = Vec::with_capacity(sequences.len());
        let mut rows = 0;
        for (index, seq) in sequences.iter().enumerate() {
            let cells: Vec<Cell> = seq.as_ref().chars().map(Cell::Symbol).collect();
            if cells.is_empty() {
                return Err(AlignError::EmptySequence { index });
            }
            rows = rows.max(cells.len());
            columns.push(cells);
        }
        for col in &mut columns {
            col.resize(rows, Cell::Gap);
        }
        Ok(Self { columns })
    }

    /// Build a matrix directly from equal-length columns.
    ///
    /// Rejects an empty column set, zero-length columns, and ragged input.
    pub fn from_columns(columns: Vec<Vec<Cell>>) -> Result<Self, AlignError> {
        if columns.is_empty() {
            return Err(AlignError::EmptyInput);
        }
        let expected = columns[0].len();
        if expected == 0 {
            return Err(AlignError::EmptySequence { index: 0 });
        }
        for (column, col) in columns.iter().enumerate() {
            if col.len() != expected {
                return Err(AlignError::RaggedMatrix {
                    column,
                    len: col.len(),
                    expected,
                });
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Number of columns (= number of input sequences).
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Cell at `(row, column)`.
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.columns[column][row]
    }

    /// Iterate over the cells of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Cell> + '_ {
        self.columns.iter().map(move |col| col[row])
    }

    /// The cells of one row as an owned vector.
    pub fn row_cells(&self, row: usize) -> Vec<Cell> {
        self.row(row).collect()
    }

    /// The cells of one column, top to bottom.
    pub fn column(&self, column: usize) -> &[Cell] {
        &self.columns[column]
    }

    /// The symbols of one column with gaps stripped.
    ///
    /// By the order-preservation invariant this equals the original input
    /// sequence at every point in the refinement, not only at the end.
    pub fn column_symbols(&self, column: usize) -> Vec<char> {
        self.columns[column]
            .iter()
            .filter_map(|c| c.symbol())
            .collect()
    }

    /// First row strictly below `row` (up to and including `end`) where
    /// `column` holds `value`.
    pub fn find_below(&self, value: char, row: usize, column: usize, end: usize) -> Option<usize> {
        let col = &self.columns[column];
        let stop = end.min(col.len().saturating_sub(1));
        (row + 1..=stop).find(|&r| col[r] == Cell::Symbol(value))
    }

    /// Count gap cells in rows `[start, end]` that have a symbol somewhere
    /// below them in the same column.
    ///
    /// This distinguishes gaps inserted by the refinement (always above a
    /// shifted symbol) from trailing padding, which never has a symbol below
    /// it. Only the former count toward the objective's gap penalty.
    pub fn interior_gaps(&self, start: usize, end: usize) -> usize {
        let end = end.min(self.rows().saturating_sub(1));
        let mut total = 0;
        for col in &self.columns {
            let Some(last) = col.iter().rposition(|c| !c.is_gap()) else {
                continue;
            };
            if last == 0 || start >= last {
                continue;
            }
            let hi = end.min(last - 1);
            if hi < start {
                continue;
            }
            total += col[start..=hi].iter().filter(|c| c.is_gap()).count();
        }
        total
    }

    /// Insert `count` gap cells at `row` in `column`, shifting everything at
    /// or below `row` down. Leaves the matrix ragged; callers renormalize
    /// once the whole shift is applied.
    pub(crate) fn insert_gaps(&mut self, column: usize, row: usize, count: usize) {
        let col = &mut self.columns[column];
        debug_assert!(row <= col.len());
        col.splice(row..row, std::iter::repeat(Cell::Gap).take(count));
    }

    /// Restore the normalized form: pad every column to the longest column's
    /// length, then drop all-gap rows from the bottom.
    pub(crate) fn normalize(&mut self) {
        let rows = self.columns.iter().map(Vec::len).max().unwrap_or(0);
        for col in &mut self.columns {
            col.resize(rows, Cell::Gap);
        }
        while self.rows() > 0
            && self
                .columns
                .iter()
                .all(|col| col.last().is_some_and(|c| c.is_gap()))
        {
            for col in &mut self.columns {
                col.pop();
            }
        }
    }

    /// Verify that every column has the same length.
    pub(crate) fn check_consistent(&self) -> Result<(), AlignError> {
        let expected = self.rows();
        for (column, col) in self.columns.iter().enumerate() {
            if col.len() != expected {
                return Err(AlignError::RaggedMatrix {
                    column,
                    len: col.len(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for PeerMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            for cell in self.row(r) {
                write!(f, "{cell}")?;
            }
            if r + 1 < self.rows() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
