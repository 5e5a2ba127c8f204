// Host-side tests for the FPS estimator.

use globe_core::*;

#[test]
fn no_estimate_until_window_closes() {
    let mut m = FpsMeter::new();
    for t in [0.0, 100.0, 200.0, 300.0, 400.0] {
        assert!(m.frame(t).is_none());
    }
    assert_eq!(m.fps(), 0.0);
}

#[test]
fn first_window_is_taken_verbatim_then_smoothed() {
    let mut m = FpsMeter::new();
    let mut last = None;
    for t in [0.0, 100.0, 200.0, 300.0, 400.0, 500.0] {
        last = m.frame(t);
    }
    // Six frames over 500 ms.
    assert!((last.unwrap() - 12.0).abs() < 1e-4);

    let mut next = None;
    for t in [600.0, 700.0, 800.0, 900.0, 1000.0] {
        next = m.frame(t);
    }
    // Sample of 10 fps blended 60/40 with the previous 12.
    assert!((next.unwrap() - 11.2).abs() < 1e-4);
    assert!((m.fps() - 11.2).abs() < 1e-4);
}
