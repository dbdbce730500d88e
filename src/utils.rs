//! Assorted heuristics for engine defaults.

/// Default number of visits a particle's best position may go unimproved
/// before the particle counts as settled.
pub const DEFAULT_STALL_THRESHOLD: u32 = 2;

/// Heuristic iteration bound for a matrix of the given dimensions.
///
/// Generous on purpose: the bound is a safeguard against pathological
/// non-convergence, not a tuning knob. Used by
/// [`crate::engine::AlignmentEngine::new`].
#[inline]
pub fn default_iteration_bound(rows: usize, columns: usize) -> usize {
    rows.saturating_mul(columns).saturating_mul(8).max(64)
}
