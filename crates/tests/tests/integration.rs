//! End-to-end scenarios for the explorer pipeline.
//!
//! These tests drive the full chain — controls → dataset → fit → report —
//! through the public session surface.

use covary_explorer::dataset::BASE_SLOPE;
use covary_explorer::session::cells;
use covary_explorer::{ControlState, Parameter, SessionError};
use covary_runtime::{CellId, CellState};
use covary_tests::TestHarness;

/// A fresh session settles every cell exactly once with the defaults.
#[test]
fn test_default_session_settles_fresh() {
    let harness = TestHarness::new();

    for (cell, runs) in harness.all_runs() {
        assert_eq!(runs, 1, "{cell}");
        assert_eq!(harness.state(cell), CellState::Fresh, "{cell}");
    }
    assert!(harness.report_ready());
    assert_eq!(harness.dataset().len(), 1000);
}

/// With sigma = 0 every observation lies exactly on the base line and the
/// correlation is 1 up to rounding.
#[test]
fn test_noiseless_sample_recovers_base_slope() {
    let mut harness = TestHarness::new();
    harness.set_sigma(0.0);

    for &(x, y) in harness.dataset().points() {
        assert!((y - BASE_SLOPE * x).abs() < 1e-12);
    }

    let fit = harness.fit();
    assert!((fit.correlation - 1.0).abs() < 1e-9);
    assert!((fit.slope - BASE_SLOPE).abs() < 1e-9);
    assert!(fit.intercept.abs() < 1e-9);
}

/// More noise weakens the measured relationship for the same sample size
/// and seed.
#[test]
fn test_noise_weakens_correlation() {
    let mut clean = TestHarness::new();
    clean.set_n(100.0);
    clean.set_sigma(0.0);

    let mut noisy = TestHarness::new();
    noisy.set_n(100.0);
    noisy.set_sigma(2.0);

    assert!(noisy.correlation().abs() < clean.correlation().abs());
}

/// Changing sigma recomputes exactly its downstream cells; the other root
/// is left memoized.
#[test]
fn test_sigma_change_recomputes_minimal_set() {
    let mut harness = TestHarness::new();
    let settled = harness.set_sigma(1.5);

    assert_eq!(
        settled.recomputed,
        vec![
            CellId::from(cells::NOISE_SIGMA),
            CellId::from(cells::DATASET),
            CellId::from(cells::FIT),
            CellId::from(cells::REPORT),
        ]
    );
    assert!(settled.is_clean());
    assert_eq!(harness.runs(cells::SAMPLE_SIZE), 1);
    assert_eq!(harness.runs(cells::DATASET), 2);
}

/// Re-running the chain with unchanged parameters reproduces the report
/// byte for byte.
#[test]
fn test_unchanged_parameters_reproduce_report() {
    let mut harness = TestHarness::new();
    let before = harness.report();

    // Same value as the default: still a change event, same output
    harness.set_sigma(0.5);
    let after = harness.report();

    assert_eq!(before, after);
}

/// Two independent sessions with the same parameters produce identical
/// artifacts.
#[test]
fn test_sessions_are_deterministic() {
    let mut a = TestHarness::new();
    let mut b = TestHarness::new();
    a.set_sigma(1.0);
    b.set_sigma(1.0);

    assert_eq!(a.report(), b.report());
    assert_eq!(a.fit(), b.fit());
}

/// An out-of-range set is rejected before the graph is touched.
#[test]
fn test_out_of_range_set_is_rejected_without_recompute() {
    let mut harness = TestHarness::new();
    let before = harness.all_runs();

    let err = harness.try_set_sigma(3.0).unwrap_err();
    assert!(matches!(err, SessionError::OutOfRange(_)));

    assert_eq!(harness.all_runs(), before);
    assert!(harness.report_ready());
    assert!(harness.report().summary.contains("sigma = 0.5"));

    let err = harness.try_set_n(50.0).unwrap_err();
    assert!(matches!(err, SessionError::OutOfRange(_)));
    assert_eq!(harness.all_runs(), before);
}

/// A zero sample size fails the dataset cell and surfaces in the report
/// view; downstream cells stay stale and the session keeps working.
#[test]
fn test_zero_sample_size_surfaces_without_fault() {
    let controls = ControlState::custom(
        Parameter::new("n", 0.0, 5000.0, 100.0, 1000.0),
        Parameter::new("sigma", 0.0, 2.0, 0.1, 0.5),
    );
    let mut harness = TestHarness::with_controls(controls);

    let settled = harness.set_n(0.0);
    assert_eq!(settled.errored, vec![CellId::from(cells::DATASET)]);
    assert_eq!(
        settled.blocked,
        vec![CellId::from(cells::FIT), CellId::from(cells::REPORT)]
    );

    assert!(!harness.report_ready());
    let text = harness.report_text();
    assert!(text.contains("report unavailable"), "{text}");
    assert!(text.contains("invalid-parameter"), "{text}");
    assert_eq!(harness.state(cells::FIT), CellState::Stale);

    // The next valid change recovers the whole chain
    harness.set_n(200.0);
    assert!(harness.report_ready());
    assert_eq!(harness.dataset().len(), 200);
}

/// Growing the sample changes the dataset length and the report text.
#[test]
fn test_sample_size_change_flows_to_report() {
    let mut harness = TestHarness::new();
    harness.set_n(2000.0);

    assert_eq!(harness.dataset().len(), 2000);
    assert!(harness.report().summary.contains("n = 2000"));
}
