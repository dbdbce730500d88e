//! Peer-matrix multiple sequence alignment.
//!
//! This crate stacks a batch of symbol sequences into a *peer matrix* (one
//! sequence per column) and refines it with a deterministic per-symbol local
//! search until corresponding symbols share rows, with gap cells standing in
//! where a sequence has nothing to contribute.
//!
//! ## How it works
//! 1. [`PeerMatrix::from_sequences`] stacks the inputs, padding short
//!    sequences with trailing gaps.
//! 2. The [`AlignmentEngine`] visits rows top to bottom. For an unaligned
//!    row it spawns a [`Particle`] per distinct symbol; each particle tests
//!    shifting its symbol down to rows where other columns already hold it,
//!    scored by the row [`objective`](scoring::objective).
//! 3. The best strictly-improving shift is committed and the loop repeats to
//!    a fixed point (or a configurable iteration bound).
//!
//! Gap insertion only pushes cells down within a column, so stripping gaps
//! from any column always reproduces the original sequence.
//!
//! ## Quick start
//! ```
//! let alignment = peer_align::align(&["abcbcdem", "acbcfg", "abchimn", "abcbcjkm"]).unwrap();
//! assert!(alignment.converged());
//! assert_eq!(alignment.matrix.columns(), 4);
//!
//! let first: String = alignment.matrix.column_symbols(0).into_iter().collect();
//! assert_eq!(first, "abcbcdem");
//! ```
//!
//! Despite the particle/swarm vocabulary, the search is deterministic and
//! single-threaded; the optional `parallel` feature only spreads read-only
//! candidate scoring across threads, with commits kept serial.

pub mod builder;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod scoring;
pub mod swarm;
pub mod utils;

pub use crate::builder::AlignmentEngineBuilder;
pub use crate::engine::{Alignment, AlignmentEngine, Termination};
pub use crate::error::AlignError;
pub use crate::matrix::{Cell, PeerMatrix};
pub use crate::scoring::Weights;
pub use crate::swarm::{locate, Particle, Position};

/// Align a batch of sequences with default engine settings.
///
/// Convenience wrapper over [`PeerMatrix::from_sequences`] followed by
/// [`AlignmentEngine::run`].
pub fn align<S: AsRef<str>>(sequences: &[S]) -> Result<Alignment, AlignError> {
    let matrix = PeerMatrix::from_sequences(sequences)?;
    AlignmentEngine::new(matrix).run()
}
