//! Indicator snapshot derivation.
//!
//! One [`SnapshotCalculator`] turns a validated [`crate::domain::TimeSeries`]
//! into an [`IndicatorSnapshot`] attached to the latest bar: simple moving
//! averages, percentage change, bias from average, volume ratio, and
//! moving-average crossover events.

pub mod calculator;
pub mod snapshot;

pub use calculator::{IndicatorError, SnapshotCalculator};
pub use snapshot::{CrossDirection, CrossoverEvent, IndicatorSnapshot};

/// Create a series from close prices for testing (volume fixed at 1000).
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::TimeSeries {
    make_series_with_volumes(closes, &vec![1000; closes.len()])
}

/// Create a series from parallel close and volume slices for testing.
#[cfg(test)]
pub fn make_series_with_volumes(closes: &[f64], volumes: &[u64]) -> crate::domain::TimeSeries {
    use crate::domain::{Bar, TimeSeries};
    assert_eq!(closes.len(), volumes.len());
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            close,
            volume,
        })
        .collect();
    TimeSeries::new("TEST", bars).expect("test series must be valid")
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
