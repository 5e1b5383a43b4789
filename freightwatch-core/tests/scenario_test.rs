//! End-to-end scenarios: bars in, label out.
//!
//! These walk the whole core path — TimeSeries construction, snapshot
//! computation, flow aggregation, classification — on small synthetic
//! histories.

use chrono::NaiveDate;
use freightwatch_core::domain::{Bar, FlowRow, TimeSeries};
use freightwatch_core::flow::net_flow;
use freightwatch_core::indicators::SnapshotCalculator;
use freightwatch_core::strategy::{classify, StrategyLabel, Thresholds};

const PRIMARY_WINDOW: usize = 20;
const VOLUME_WINDOW: usize = 5;

fn series(closes: &[f64], volumes: &[u64]) -> TimeSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| Bar {
            date: base + chrono::Duration::days(i as i64),
            close,
            volume,
        })
        .collect();
    TimeSeries::new("TEST", bars).unwrap()
}

fn flat_series(close: f64, len: usize) -> TimeSeries {
    series(&vec![close; len], &vec![1000; len])
}

fn calculator() -> SnapshotCalculator {
    SnapshotCalculator::new(&[PRIMARY_WINDOW], VOLUME_WINDOW)
}

#[test]
fn constant_series_with_unknown_flow_is_range_bound() {
    // 21 identical closes: pct change 0, bias 0, volume ratio 1.0, and the
    // close sits exactly on its MA, which counts as NOT bullish.
    let s = flat_series(100.0, 21);
    let snap = calculator().compute(&s).unwrap();

    assert_eq!(snap.pct_change_from_prev, 0.0);
    assert_eq!(snap.bias_at(PRIMARY_WINDOW), Some(0.0));
    assert_eq!(snap.volume_ratio, 1.0);
    assert_eq!(snap.is_above_ma(PRIMARY_WINDOW), Some(false));

    let label = classify(&snap, &snap, None, PRIMARY_WINDOW, &Thresholds::default());
    assert_eq!(label, StrategyLabel::RangeBound);
}

#[test]
fn extended_security_in_bullish_confluence_is_overheated() {
    // Index strictly above its 20-bar MA.
    let mut index_closes = vec![100.0; 20];
    index_closes.push(120.0);
    let index = calculator()
        .compute(&series(&index_closes, &vec![1000; 21]))
        .unwrap();
    assert_eq!(index.is_above_ma(PRIMARY_WINDOW), Some(true));

    // Security ~15% above its MA.
    let mut sec_closes = vec![100.0; 20];
    sec_closes.push(118.0);
    let sec = calculator()
        .compute(&series(&sec_closes, &vec![1000; 21]))
        .unwrap();
    assert!(sec.bias_at(PRIMARY_WINDOW).unwrap() > 0.10);

    let rows = vec![FlowRow {
        date: NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
        buy_volume: 800,
        sell_volume: 300,
    }];
    let nf = net_flow(&rows).unwrap();
    assert_eq!(nf.net, 500);

    let label = classify(&index, &sec, Some(&nf), PRIMARY_WINDOW, &Thresholds::default());
    assert_eq!(label, StrategyLabel::Overheated);
}

#[test]
fn weak_index_and_negative_flow_stand_aside() {
    // Index strictly below its MA.
    let mut index_closes = vec![100.0; 20];
    index_closes.push(90.0);
    let index = calculator()
        .compute(&series(&index_closes, &vec![1000; 21]))
        .unwrap();
    assert_eq!(index.is_above_ma(PRIMARY_WINDOW), Some(false));

    // Unremarkable security: small move, normal volume.
    let sec = calculator().compute(&flat_series(50.0, 21)).unwrap();

    let rows = vec![FlowRow {
        date: NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
        buy_volume: 100,
        sell_volume: 300,
    }];
    let nf = net_flow(&rows).unwrap();
    assert_eq!(nf.net, -200);

    let label = classify(&index, &sec, Some(&nf), PRIMARY_WINDOW, &Thresholds::default());
    assert_eq!(label, StrategyLabel::StandAside);
}

#[test]
fn snapshot_failure_for_one_series_does_not_poison_another() {
    // The short series fails; the long one still computes. Isolation across
    // securities is the runner's job, but the calculator must stay pure.
    let calc = calculator();
    assert!(calc.compute(&flat_series(100.0, 5)).is_err());
    assert!(calc.compute(&flat_series(100.0, 30)).is_ok());
}

#[test]
fn crossover_advisory_does_not_change_the_label() {
    // Index crosses up through its MA on the latest transition; with
    // unknown flow the label is still resolved by the table alone.
    let mut index_closes = vec![100.0; 21];
    index_closes[20] = 90.0;
    index_closes.push(130.0);
    let calc = SnapshotCalculator::new(&[PRIMARY_WINDOW], VOLUME_WINDOW)
        .with_crossover_detection();
    let index = calc
        .compute(&series(&index_closes, &vec![1000; 22]))
        .unwrap();
    assert_eq!(index.crossings.len(), 1);

    let sec = calculator().compute(&flat_series(50.0, 21)).unwrap();
    let label = classify(&index, &sec, None, PRIMARY_WINDOW, &Thresholds::default());
    assert_eq!(label, StrategyLabel::RangeBound);
}
