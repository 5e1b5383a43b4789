//! Institutional order-flow records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One institutional buy/sell record for a symbol.
///
/// Providers typically return one row per investor category per date
/// (foreign, investment trust, dealer, ...). The aggregator sums across
/// categories for the latest date; callers over-fetch a trailing window to
/// tolerate provider reporting lag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRow {
    pub date: NaiveDate,
    pub buy_volume: u64,
    pub sell_volume: u64,
}

/// Signed institutional net flow for a single reporting date.
///
/// `net > 0` is a net-buy state, `net < 0` net-sell, `net == 0` neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetFlow {
    /// The resolved latest reporting date.
    pub date: NaiveDate,
    /// `buy_volume - sell_volume` summed over all rows at `date`.
    pub net: i64,
}

impl NetFlow {
    /// Strictly positive net flow. Zero is neutral, not a buy.
    pub fn is_net_buy(&self) -> bool {
        self.net > 0
    }
}
