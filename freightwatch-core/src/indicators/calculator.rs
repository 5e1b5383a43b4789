//! Snapshot calculator — moving averages, change, bias, volume ratio,
//! crossover detection.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::TimeSeries;

use super::snapshot::{CrossDirection, CrossoverEvent, IndicatorSnapshot};

/// Errors from indicator computation.
///
/// Both variants are terminal for the computation they occur in; the
/// calculator never substitutes defaults.
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("insufficient history for '{symbol}': need {required} bars, have {available}")]
    InsufficientHistory {
        symbol: String,
        required: usize,
        available: usize,
    },

    #[error("division undefined for '{symbol}': {context} is zero")]
    DivisionUndefined {
        symbol: String,
        context: &'static str,
    },
}

/// Derives an [`IndicatorSnapshot`] from a [`TimeSeries`].
///
/// Configured once with the requested moving-average windows and reused
/// across symbols. Pure function of its input series; no mutation, no I/O.
#[derive(Debug, Clone)]
pub struct SnapshotCalculator {
    windows: Vec<usize>,
    volume_window: usize,
    detect_crossings: bool,
}

impl SnapshotCalculator {
    /// `windows` are the price moving-average windows; `volume_window` is
    /// the window for the volume moving average behind the volume ratio.
    pub fn new(windows: &[usize], volume_window: usize) -> Self {
        assert!(!windows.is_empty(), "at least one window is required");
        assert!(
            windows.iter().all(|&w| w >= 1),
            "windows must be >= 1"
        );
        assert!(volume_window >= 1, "volume_window must be >= 1");

        let mut windows = windows.to_vec();
        windows.sort_unstable();
        windows.dedup();

        Self {
            windows,
            volume_window,
            detect_crossings: false,
        }
    }

    /// Also detect price/MA crossovers at the latest bar transition.
    ///
    /// Raises the history requirement by one bar: the moving average must be
    /// computable one bar earlier than the latest.
    pub fn with_crossover_detection(mut self) -> Self {
        self.detect_crossings = true;
        self
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Bars required before `compute` succeeds.
    ///
    /// `max(window) + 1` funds the prior bar that percentage change needs;
    /// crossover detection needs one more.
    pub fn required_bars(&self) -> usize {
        let max_window = self
            .windows
            .iter()
            .copied()
            .chain(std::iter::once(self.volume_window))
            .max()
            .expect("windows is never empty");
        if self.detect_crossings {
            max_window + 2
        } else {
            max_window + 1
        }
    }

    pub fn compute(&self, series: &TimeSeries) -> Result<IndicatorSnapshot, IndicatorError> {
        let n = series.len();
        let required = self.required_bars();
        if n < required {
            return Err(IndicatorError::InsufficientHistory {
                symbol: series.symbol().to_string(),
                required,
                available: n,
            });
        }

        let closes: Vec<f64> = series.closes().collect();
        let volumes: Vec<f64> = series.volumes().map(|v| v as f64).collect();

        let last_close = closes[n - 1];
        let prev_close = closes[n - 2];
        let last_volume = series.last().volume;

        if prev_close == 0.0 {
            return Err(IndicatorError::DivisionUndefined {
                symbol: series.symbol().to_string(),
                context: "previous close",
            });
        }
        let pct_change_from_prev = (last_close - prev_close) / prev_close;

        let mut moving_average = BTreeMap::new();
        let mut bias = BTreeMap::new();
        for &w in &self.windows {
            let ma = mean(&closes[n - w..]);
            if ma == 0.0 {
                return Err(IndicatorError::DivisionUndefined {
                    symbol: series.symbol().to_string(),
                    context: "moving average",
                });
            }
            moving_average.insert(w, ma);
            bias.insert(w, (last_close - ma) / ma);
        }

        let volume_ma = mean(&volumes[n - self.volume_window..]);
        if volume_ma == 0.0 {
            return Err(IndicatorError::DivisionUndefined {
                symbol: series.symbol().to_string(),
                context: "volume moving average",
            });
        }
        let volume_ratio = last_volume as f64 / volume_ma;

        let crossings = if self.detect_crossings {
            self.detect(&closes)
        } else {
            vec![]
        };

        Ok(IndicatorSnapshot {
            last_close,
            prev_close,
            last_volume,
            pct_change_from_prev,
            moving_average,
            bias,
            volume_ratio,
            crossings,
        })
    }

    /// Crossover detection at the latest transition only.
    ///
    /// For each window, compares the sign of `close - ma` at the
    /// second-to-last bar against the last bar, each MA computed over the
    /// bars available up to that point. A move from non-positive to positive
    /// is `Up`; positive to non-positive is `Down`.
    fn detect(&self, closes: &[f64]) -> Vec<CrossoverEvent> {
        let n = closes.len();
        let mut events = vec![];
        for &w in &self.windows {
            let ma_cur = mean(&closes[n - w..]);
            let ma_prev = mean(&closes[n - 1 - w..n - 1]);
            let diff_prev = closes[n - 2] - ma_prev;
            let diff_cur = closes[n - 1] - ma_cur;

            let direction = if diff_prev <= 0.0 && diff_cur > 0.0 {
                Some(CrossDirection::Up)
            } else if diff_prev > 0.0 && diff_cur <= 0.0 {
                Some(CrossDirection::Down)
            } else {
                None
            };

            if let Some(direction) = direction {
                events.push(CrossoverEvent {
                    direction,
                    window: w,
                    bar_index: n - 1,
                });
            }
        }
        events
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
