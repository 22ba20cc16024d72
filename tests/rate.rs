use std::time::{Duration, Instant};

use ttyplot::data::rate::Derivative;
use ttyplot::RateTransform;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

#[test]
fn rate_is_change_per_second() {
    let t0 = Instant::now();
    let mut d = Derivative::default();
    assert_eq!(d.apply(10.0, t0), 0.0, "first sample has no reference");
    assert_eq!(d.apply(30.0, t0 + secs(2)), 10.0);
    assert_eq!(d.last_interval(), Some(secs(2)));
}

#[test]
fn counter_rewind_clamps_rate_and_moves_reference() {
    let t0 = Instant::now();
    let mut d = Derivative::default();
    d.apply(100.0, t0);
    assert_eq!(d.apply(20.0, t0 + secs(1)), 0.0);
    // The next rate is measured from the rewound counter, not from 100.
    assert_eq!(d.apply(25.0, t0 + secs(2)), 5.0);
}

#[test]
fn zero_interval_reports_zero_and_keeps_reference() {
    let t0 = Instant::now();
    let mut d = Derivative::default();
    d.apply(10.0, t0);
    assert_eq!(d.apply(50.0, t0), 0.0);
    assert_eq!(d.apply(60.0, t0 + secs(1)), 50.0);
}

#[test]
fn disabled_transform_passes_values_through() {
    let mut rt = RateTransform::new(false);
    assert_eq!(rt.apply(-3.0, Some(7.0), Instant::now()), (-3.0, Some(7.0)));
    assert!(rt.last_interval().is_none());
}

#[test]
fn both_series_are_derived_independently() {
    let t0 = Instant::now();
    let mut rt = RateTransform::new(true);
    assert_eq!(rt.apply(0.0, Some(100.0), t0), (0.0, Some(0.0)));
    assert_eq!(rt.apply(4.0, Some(90.0), t0 + secs(2)), (2.0, Some(0.0)));
    assert_eq!(rt.last_interval(), Some(secs(2)));
}

#[test]
fn enabling_starts_a_fresh_run() {
    let t0 = Instant::now();
    let mut rt = RateTransform::new(true);
    rt.apply(100.0, None, t0);
    assert_eq!(rt.apply(200.0, None, t0 + secs(1)).0, 100.0);

    assert!(!rt.toggle());
    assert_eq!(rt.apply(250.0, None, t0 + secs(2)).0, 250.0);
    assert!(rt.toggle());
    assert_eq!(rt.apply(300.0, None, t0 + secs(3)).0, 0.0);
    assert_eq!(rt.apply(310.0, None, t0 + secs(4)).0, 10.0);
}
