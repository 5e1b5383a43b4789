//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Close/volume bar for a single symbol on a single trading day.
///
/// The monitor only looks at closes and volumes, so the full OHLC shape is
/// not carried. Dates within a series are strictly increasing; that invariant
/// is enforced by [`crate::domain::TimeSeries::new`], not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic sanity check: close is a finite positive number.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
