//! TimeSeries — validated, immutable bar history for one symbol.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::Bar;

/// Errors from time series construction.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("series for '{symbol}' is empty")]
    Empty { symbol: String },

    #[error("series for '{symbol}' has out-of-order or duplicate date at position {position}")]
    OutOfOrder { symbol: String, position: usize },

    #[error("series for '{symbol}' has a non-finite or non-positive close at position {position}")]
    InvalidClose { symbol: String, position: usize },
}

/// Ordered close/volume history for one symbol.
///
/// Construction validates the bars once; after that the series is immutable
/// and every downstream computation can rely on:
/// - at least one bar
/// - strictly increasing dates (no duplicates)
/// - finite, positive closes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl TimeSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(SeriesError::InvalidClose {
                    symbol,
                    position: i,
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(SeriesError::OutOfOrder {
                    symbol,
                    position: i,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The most recent bar. The non-empty invariant makes this total.
    pub fn last(&self) -> &Bar {
        self.bars.last().expect("TimeSeries is never empty")
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    pub fn volumes(&self) -> impl Iterator<Item = u64> + '_ {
        self.bars.iter().map(|b| b.volume)
    }
}
