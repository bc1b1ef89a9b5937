extern crate nalgebra as na;

use na::DMatrix;
use diodem::{apply_crop, crop_tail, DiodemError, Rates, Signal, Tree};

fn zeros(len: usize) -> Tree<Signal> {
    Tree::Leaf(Signal::vector(DMatrix::zeros(len, 3)))
}

fn two_rate_tree(len_a: usize, len_b: usize) -> Tree<Signal> {
    Tree::branch().with("a", zeros(len_a)).with("b", zeros(len_b))
}

fn two_rates(hz_a: f64, hz_b: f64) -> Rates {
    Rates::Map(Tree::branch().with("a", Tree::Leaf(hz_a)).with("b", Tree::Leaf(hz_b)))
}

fn lengths(tree: &Tree<Signal>) -> Vec<usize> {
    tree.leaves().iter().map(|s| s.len()).collect()
}

#[test]
fn already_aligned_lengths_need_no_search() {
    let report = crop_tail(&two_rate_tree(1003, 400), Some(&two_rates(100.0, 40.0)), true, false).unwrap();

    assert_eq!(lengths(&report.signals), vec!(1000, 400));
    assert!((report.shortest_length - 10.0).abs() < 1e-12);
    assert_eq!(report.hz_of_shortest_length, 40.0);
    assert_eq!(report.iterations, 0);
    assert!(!report.degraded);
    assert!(report.warnings.is_empty());
}

#[test]
fn strict_crop_steps_back_to_a_common_boundary() {
    // 10.03 s is not a whole number of 40 Hz samples, 10.00 s is
    let report = crop_tail(&two_rate_tree(1003, 410), Some(&two_rates(100.0, 40.0)), true, true).unwrap();

    assert_eq!(lengths(&report.signals), vec!(1000, 400));
    assert!((report.shortest_length - 10.0).abs() < 1e-9);
    assert_eq!(report.hz_of_shortest_length, 100.0);
    assert_eq!(report.iterations, 2);
    assert!(!report.degraded);
}

#[test]
fn durations_agree_within_one_sample_after_crop() {
    let report = crop_tail(&two_rate_tree(1003, 410), Some(&two_rates(100.0, 40.0)), true, false).unwrap();
    let durations = [report.signals.leaf_at("a").unwrap().len() as f64 / 100.0, report.signals.leaf_at("b").unwrap().len() as f64 / 40.0];
    assert!((durations[0] - durations[1]).abs() <= 1.0 / 40.0);
}

#[test]
fn non_strict_crop_rounds_sample_counts_up() {
    let report = crop_tail(&two_rate_tree(1003, 410), Some(&two_rates(100.0, 40.0)), false, false).unwrap();

    assert_eq!(lengths(&report.signals), vec!(1003, 402));
    assert!((report.shortest_length - 10.03).abs() < 1e-12);
    assert_eq!(report.iterations, 0);
}

#[test]
fn search_gives_up_and_reports_degraded_crop() {
    // no length of the form 100.02 - i(i+1)/200 is a whole number of 33 Hz samples
    let report = crop_tail(&two_rate_tree(10002, 3400), Some(&two_rates(100.0, 33.0)), true, false).unwrap();

    assert!(report.degraded);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings[0].contains("still no clean crop possible"));
    assert_eq!(report.iterations, 101);
    assert!((report.shortest_length - 48.51).abs() < 1e-9);
    assert_eq!(lengths(&report.signals), vec!(4851, 1601));
}

#[test]
fn crop_is_idempotent() {
    let rates = two_rates(100.0, 40.0);
    let once = crop_tail(&two_rate_tree(1003, 410), Some(&rates), true, false).unwrap();
    let twice = crop_tail(&once.signals, Some(&rates), true, false).unwrap();

    assert_eq!(twice.signals, once.signals);
    assert_eq!(twice.iterations, 0);
}

#[test]
fn ties_resolve_to_the_first_leaf_in_key_order() {
    let report = crop_tail(&two_rate_tree(400, 1000), Some(&two_rates(40.0, 100.0)), true, false).unwrap();
    assert_eq!(report.hz_of_shortest_length, 40.0);

    let report = crop_tail(&two_rate_tree(1000, 400), Some(&two_rates(100.0, 40.0)), true, false).unwrap();
    assert_eq!(report.hz_of_shortest_length, 100.0);
}

#[test]
fn without_rates_lengths_are_sample_counts() {
    let tree = Tree::branch()
        .with("seg1", Tree::branch().with("acc", zeros(10)).with("quat", Tree::Leaf(Signal::vector_1d(vec!(0.0; 7)))));
    let report = crop_tail(&tree, None, true, false).unwrap();

    assert_eq!(report.shortest_length, 7.0);
    assert_eq!(report.hz_of_shortest_length, 1.0);
    assert_eq!(lengths(&report.signals), vec!(7, 7));
    assert!(report.signals.leaf_at("seg1/quat").unwrap().is_1d());
}

#[test]
fn empty_tree_crops_to_nothing() {
    let report = crop_tail(&Tree::branch(), Some(&Rates::Scalar(100.0)), true, false).unwrap();
    assert_eq!(report.signals.leaf_count(), 0);
    assert_eq!(report.shortest_length, 0.0);
}

#[test]
fn exact_crop_rejects_fractional_sample_boundaries() {
    let tree = Tree::branch().with("a", zeros(500));
    match apply_crop(&tree, &Rates::Scalar(40.0), 10.01, true) {
        Err(DiodemError::NonCleanCrop { shortest_length, hz }) => {
            assert_eq!(shortest_length, 10.01);
            assert_eq!(hz, 40.0);
        },
        other => panic!("expected non-clean crop, got {:?}", other)
    }

    let rounded_up = apply_crop(&tree, &Rates::Scalar(40.0), 10.01, false).unwrap();
    assert_eq!(lengths(&rounded_up), vec!(401));
    let exact = apply_crop(&tree, &Rates::Scalar(40.0), 10.0, true).unwrap();
    assert_eq!(lengths(&exact), vec!(400));
}

#[test]
fn crop_rejects_mismatched_rate_map() {
    let rates = Rates::Map(Tree::branch().with("a", Tree::Leaf(100.0)));
    let result = crop_tail(&two_rate_tree(10, 10), Some(&rates), true, false);
    assert!(matches!(result, Err(DiodemError::TreeStructureMismatch { .. })));
}

#[test]
fn crop_rejects_non_positive_rates() {
    // a 0 Hz leaf would otherwise last forever and be cut to nothing
    let result = crop_tail(&two_rate_tree(10, 10), Some(&two_rates(0.0, 100.0)), true, false);
    assert!(matches!(result, Err(DiodemError::InvalidSignalShape { .. })));

    let result = crop_tail(&two_rate_tree(10, 10), Some(&two_rates(100.0, -40.0)), false, false);
    assert!(matches!(result, Err(DiodemError::InvalidSignalShape { .. })));

    let tree = Tree::branch().with("a", zeros(10));
    assert!(matches!(apply_crop(&tree, &Rates::Scalar(0.0), 0.05, false), Err(DiodemError::InvalidSignalShape { .. })));
    assert!(matches!(apply_crop(&tree, &Rates::Scalar(-100.0), 0.05, true), Err(DiodemError::InvalidSignalShape { .. })));
}
