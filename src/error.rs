//! Error taxonomy for peer-matrix alignment.
//!
//! Input validation failures surface before any alignment work begins and are
//! fatal. Hitting the iteration bound is recoverable: the error carries the
//! best-effort alignment accumulated so far.

use thiserror::Error;

use crate::engine::Alignment;

/// Errors produced while building or refining a peer matrix.
#[derive(Debug, Error)]
pub enum AlignError {
    /// The input batch contained no sequences at all.
    #[error("input must contain at least one sequence")]
    EmptyInput,

    /// A sequence in the input batch was empty.
    #[error("sequence {index} is empty")]
    EmptySequence { index: usize },

    /// Matrix invariant violation: columns disagree on row count.
    #[error("column {column} has {len} rows, expected {expected}")]
    RaggedMatrix {
        column: usize,
        len: usize,
        expected: usize,
    },

    /// The refinement loop hit its iteration bound before reaching a fixed
    /// point. The partial alignment is still usable; callers decide whether
    /// to accept it.
    #[error("no fixed point within {bound} iterations")]
    NonConvergence {
        bound: usize,
        alignment: Box<Alignment>,
    },
}
