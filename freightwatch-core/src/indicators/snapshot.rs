//! IndicatorSnapshot — derived values attached to the latest bar.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Direction of a moving-average crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossDirection {
    /// Close moved from at-or-below the MA to above it.
    Up,
    /// Close moved from above the MA to at-or-below it.
    Down,
}

/// A price/moving-average crossover at the latest bar transition.
///
/// Only the transition between the last two bars is examined; historical
/// crossings are never scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub direction: CrossDirection,
    /// The moving-average window that was crossed.
    pub window: usize,
    /// Index of the bar at which the crossing completed (the last bar).
    pub bar_index: usize,
}

/// Read-only derived statistics for one series at its last bar.
///
/// Computed fresh on each invocation and discarded after the report is
/// built; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub last_close: f64,
    pub prev_close: f64,
    pub last_volume: u64,
    /// `(last_close - prev_close) / prev_close`
    pub pct_change_from_prev: f64,
    /// Simple moving average of close per requested window.
    pub moving_average: BTreeMap<usize, f64>,
    /// `(last_close - ma[w]) / ma[w]` per requested window.
    pub bias: BTreeMap<usize, f64>,
    /// `last_volume / ma(volume, volume_window)`
    pub volume_ratio: f64,
    /// Crossover events at the latest bar transition, if detection was on.
    pub crossings: Vec<CrossoverEvent>,
}

impl IndicatorSnapshot {
    pub fn ma(&self, window: usize) -> Option<f64> {
        self.moving_average.get(&window).copied()
    }

    pub fn bias_at(&self, window: usize) -> Option<f64> {
        self.bias.get(&window).copied()
    }

    /// Strict comparison: a close exactly on the MA is NOT above it.
    ///
    /// Returns `None` when the window was not part of the snapshot.
    pub fn is_above_ma(&self, window: usize) -> Option<bool> {
        self.ma(window).map(|ma| self.last_close > ma)
    }
}
