//! Provider traits and structured error types.
//!
//! The traits abstract over market-data sources (Yahoo chart API, FinMind,
//! test fakes) so implementations can be swapped and mocked. Fetch and
//! parse failures surface as explicit [`DataError`] kinds — never as a
//! placeholder display string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use freightwatch_core::domain::FlowRow;

/// Raw daily close/volume bar from a provider (before series validation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Source of daily price/volume bars.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a date range, oldest first.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError>;
}

/// Source of institutional buy/sell flow rows.
pub trait FlowProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch flow rows for a symbol over a date range. Callers over-fetch a
    /// trailing window to tolerate provider reporting lag; the core
    /// aggregator picks the latest date.
    fn fetch_flows(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FlowRow>, DataError>;
}

/// Progress callback for multi-symbol fetches.
pub trait FetchProgress: Send + Sync {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), DataError>);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {symbol}"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_render_their_context() {
        let err = DataError::SymbolNotFound {
            symbol: "2606.TW".into(),
        };
        assert_eq!(err.to_string(), "symbol not found: 2606.TW");

        let err = DataError::RateLimited {
            retry_after_secs: 30,
        };
        assert!(err.to_string().contains("30s"));
    }
}
