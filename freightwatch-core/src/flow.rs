//! Net-flow aggregation over the latest reporting date.

use thiserror::Error;

use crate::domain::{FlowRow, NetFlow};

/// Errors from flow aggregation.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The input row set is empty. Flow is unknown, not zero; the
    /// classifier treats this state differently from a neutral reading.
    #[error("no institutional flow rows available")]
    NoData,
}

/// Reduce a set of flow rows to one signed net value for the latest date.
///
/// Selects the maximum date present, sums buy and sell volumes restricted
/// to rows at that date, and returns their difference. Rows at earlier
/// dates are ignored; the latest reporting date is not assumed to be
/// "today".
pub fn net_flow(rows: &[FlowRow]) -> Result<NetFlow, FlowError> {
    let latest = rows.iter().map(|r| r.date).max().ok_or(FlowError::NoData)?;

    let (buy, sell) = rows
        .iter()
        .filter(|r| r.date == latest)
        .fold((0u64, 0u64), |(b, s), r| {
            (b + r.buy_volume, s + r.sell_volume)
        });

    Ok(NetFlow {
        date: latest,
        net: buy as i64 - sell as i64,
    })
}
