//! FinMind institutional flow provider.
//!
//! Fetches the `TaiwanStockInstitutionalInvestorsBuySell` dataset from the
//! FinMind v4 data API. One response row per investor category per date;
//! rows are passed through as-is and the core aggregator sums the latest
//! date across categories.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use freightwatch_core::domain::FlowRow;

use super::provider::{DataError, FlowProvider};

const API_URL: &str = "https://api.finmindtrade.com/api/v4/data";
const DATASET: &str = "TaiwanStockInstitutionalInvestorsBuySell";

/// FinMind v4 data API response envelope.
#[derive(Debug, Deserialize)]
struct FinMindResponse {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    data: Vec<FinMindRow>,
}

#[derive(Debug, Deserialize)]
struct FinMindRow {
    date: NaiveDate,
    buy: u64,
    sell: u64,
}

/// FinMind institutional buy/sell provider.
pub struct FinMindFlowProvider {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl FinMindFlowProvider {
    /// A missing token is allowed: FinMind serves a limited unauthenticated
    /// quota, and auth failures surface as `DataError::AuthenticationRequired`.
    pub fn new(token: Option<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client, token }
    }

    /// Map a parsed response envelope to flow rows.
    fn parse_response(symbol: &str, resp: FinMindResponse) -> Result<Vec<FlowRow>, DataError> {
        match resp.status {
            Some(200) | None => {}
            Some(402) | Some(401) => {
                return Err(DataError::AuthenticationRequired(
                    resp.msg.unwrap_or_else(|| "FinMind token rejected".into()),
                ))
            }
            Some(status) => {
                return Err(DataError::Other(format!(
                    "FinMind status {status} for {symbol}: {}",
                    resp.msg.unwrap_or_default()
                )))
            }
        }

        Ok(resp
            .data
            .into_iter()
            .map(|row| FlowRow {
                date: row.date,
                buy_volume: row.buy,
                sell_volume: row.sell,
            })
            .collect())
    }
}

impl FlowProvider for FinMindFlowProvider {
    fn name(&self) -> &str {
        "finmind"
    }

    fn fetch_flows(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FlowRow>, DataError> {
        // FinMind addresses Taiwanese equities by bare stock id ("2606"),
        // while the bar provider uses the exchange-qualified form ("2606.TW").
        let data_id = symbol.split('.').next().unwrap_or(symbol);

        let mut query: Vec<(&str, String)> = vec![
            ("dataset", DATASET.to_string()),
            ("data_id", data_id.to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ];
        if let Some(token) = &self.token {
            query.push(("token", token.clone()));
        }

        let resp = self
            .client
            .get(API_URL)
            .query(&query)
            .send()
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    DataError::NetworkUnreachable(e.to_string())
                } else {
                    DataError::Other(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                retry_after_secs: 60,
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let envelope: FinMindResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> FinMindResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn parses_category_rows() {
        let resp = envelope(
            r#"{"msg":"success","status":200,"data":[
                {"date":"2024-03-15","stock_id":"2606","buy":1000,"sell":400,"name":"Foreign_Investor"},
                {"date":"2024-03-15","stock_id":"2606","buy":200,"sell":100,"name":"Investment_Trust"},
                {"date":"2024-03-14","stock_id":"2606","buy":50,"sell":75,"name":"Foreign_Investor"}]}"#,
        );
        let rows = FinMindFlowProvider::parse_response("2606.TW", resp).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(rows[0].buy_volume, 1000);
        assert_eq!(rows[0].sell_volume, 400);
    }

    #[test]
    fn empty_data_is_ok_empty() {
        // An empty row set is valid here; the core aggregator is the one
        // that turns it into NoData.
        let resp = envelope(r#"{"msg":"success","status":200,"data":[]}"#);
        let rows = FinMindFlowProvider::parse_response("2606.TW", resp).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn auth_status_maps_to_authentication_required() {
        let resp = envelope(r#"{"msg":"token is invalid","status":402,"data":[]}"#);
        let err = FinMindFlowProvider::parse_response("2606.TW", resp).unwrap_err();
        assert!(matches!(err, DataError::AuthenticationRequired(_)));
    }

    #[test]
    fn unexpected_status_maps_to_other() {
        let resp = envelope(r#"{"msg":"server error","status":500,"data":[]}"#);
        let err = FinMindFlowProvider::parse_response("2606.TW", resp).unwrap_err();
        assert!(matches!(err, DataError::Other(_)));
    }

    #[test]
    fn ignores_unknown_fields() {
        let resp = envelope(
            r#"{"msg":"success","status":200,"data":[
                {"date":"2024-03-15","stock_id":"2606","buy":10,"sell":5,
                 "name":"Dealer_self","extra_column":123}]}"#,
        );
        let rows = FinMindFlowProvider::parse_response("2606.TW", resp).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
