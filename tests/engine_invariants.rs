//! Property coverage for the refinement loop: the order-preservation
//! invariant, weight bounds, fixed-point idempotence and bound handling.

use peer_align::{align, scoring, AlignError, AlignmentEngine, AlignmentEngineBuilder, PeerMatrix};
use proptest::prelude::*;

fn sequences() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[abcd]{1,10}", 1..6)
}

proptest! {
    #[test]
    fn columns_reproduce_inputs(seqs in sequences()) {
        let alignment = align(&seqs).unwrap();
        prop_assert_eq!(alignment.matrix.columns(), seqs.len());
        for (i, seq) in seqs.iter().enumerate() {
            let read_back: String = alignment.matrix.column_symbols(i).into_iter().collect();
            prop_assert_eq!(&read_back, seq);
        }
    }

    #[test]
    fn weights_stay_in_unit_interval(seqs in sequences()) {
        let alignment = align(&seqs).unwrap();
        for r in 0..alignment.matrix.rows() {
            let w = scoring::weight(&alignment.matrix.row_cells(r));
            prop_assert!((0.0..=1.0).contains(&w), "weight {w} out of range at row {r}");
        }
    }

    #[test]
    fn full_implies_aligned_and_gap_free(seqs in sequences()) {
        let alignment = align(&seqs).unwrap();
        for r in 0..alignment.matrix.rows() {
            let row = alignment.matrix.row_cells(r);
            if scoring::full(&row) {
                prop_assert!(scoring::aligned(&row));
                prop_assert!(!row.iter().any(|c| c.is_gap()));
            }
        }
    }

    #[test]
    fn converged_output_is_a_fixed_point(seqs in proptest::collection::vec("[abc]{1,8}", 1..5)) {
        let alignment = align(&seqs).unwrap();
        if alignment.converged() {
            let rerun = AlignmentEngine::new(alignment.matrix.clone()).run().unwrap();
            prop_assert_eq!(rerun.shifts, 0);
            prop_assert!(rerun.converged());
            prop_assert_eq!(&rerun.matrix, &alignment.matrix);
        }
    }

    #[test]
    fn lookahead_window_preserves_the_invariant(seqs in sequences(), lookahead in 1usize..4) {
        let matrix = PeerMatrix::from_sequences(&seqs).unwrap();
        let alignment = AlignmentEngineBuilder::new(matrix)
            .with_lookahead(lookahead)
            .build()
            .run()
            .unwrap();
        for (i, seq) in seqs.iter().enumerate() {
            let read_back: String = alignment.matrix.column_symbols(i).into_iter().collect();
            prop_assert_eq!(&read_back, seq);
        }
    }
}

#[test]
fn bound_exceeded_still_returns_a_usable_matrix() {
    let inputs = ["abcbcdem", "acbcfg", "abchimn", "abcbcjkm"];
    let matrix = PeerMatrix::from_sequences(&inputs).unwrap();
    let alignment = AlignmentEngineBuilder::new(matrix)
        .with_max_iterations(5)
        .build()
        .run()
        .unwrap();
    assert!(!alignment.converged());
    // The partial matrix still honors the order-preservation invariant.
    for (i, input) in inputs.iter().enumerate() {
        let read_back: String = alignment.matrix.column_symbols(i).into_iter().collect();
        assert_eq!(&read_back, input);
    }

    match alignment.into_converged() {
        Err(AlignError::NonConvergence { bound, alignment }) => {
            assert_eq!(bound, 5);
            assert_eq!(alignment.matrix.columns(), 4);
        }
        other => panic!("expected NonConvergence, got {other:?}"),
    }
}

#[test]
fn validation_failures_surface_before_any_work() {
    assert!(matches!(
        align::<&str>(&[]),
        Err(AlignError::EmptyInput)
    ));
    assert!(matches!(
        align(&["abc", "", "de"]),
        Err(AlignError::EmptySequence { index: 1 })
    ));
}
