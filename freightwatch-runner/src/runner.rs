//! Monitoring pass orchestrator — wires providers, engine, and report data.
//!
//! One entry point: `run_monitor()` computes the index assessment, then
//! evaluates every configured security. Per-security failures degrade to an
//! `Unavailable` outcome; only an index failure aborts the whole pass.

use chrono::{DateTime, Local, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use freightwatch_core::domain::{Bar, NetFlow, SeriesError, TimeSeries};
use freightwatch_core::flow::net_flow;
use freightwatch_core::indicators::{IndicatorError, IndicatorSnapshot, SnapshotCalculator};
use freightwatch_core::strategy::{classify, StrategyLabel};

use crate::config::{ConfigError, MonitorConfig, SecuritySpec};
use crate::data::{BarProvider, DataError, FetchProgress, FlowProvider, RawBar};

/// Errors that abort a whole monitoring pass.
///
/// Securities are isolated from each other; only configuration problems and
/// index failures land here.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("index data error for '{symbol}': {source}")]
    IndexData {
        symbol: String,
        #[source]
        source: DataError,
    },

    #[error("index series error: {0}")]
    IndexSeries(#[from] SeriesError),

    #[error("index indicator error: {0}")]
    IndexIndicator(#[from] IndicatorError),
}

/// Derived state of the freight index for this pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexAssessment {
    pub symbol: String,
    pub snapshot: IndicatorSnapshot,
    /// Strictly above the primary-window moving average.
    pub bullish: bool,
}

/// Fully evaluated security.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAssessment {
    pub symbol: String,
    pub name: String,
    pub snapshot: IndicatorSnapshot,
    /// `None` is the explicit flow-unknown state (fetch failed or the
    /// provider returned no rows).
    pub net_flow: Option<NetFlow>,
    pub label: StrategyLabel,
}

/// Outcome for one configured security.
///
/// A failed security stays in the report as `Unavailable`; it is rendered
/// as "no signal available", never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityOutcome {
    Evaluated(SecurityAssessment),
    Unavailable {
        symbol: String,
        name: String,
        reason: String,
    },
}

impl SecurityOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Evaluated(a) => &a.symbol,
            Self::Unavailable { symbol, .. } => symbol,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Evaluated(a) => &a.name,
            Self::Unavailable { name, .. } => name,
        }
    }
}

/// Structured result of one monitoring pass, handed to the formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorReport {
    pub generated_at: DateTime<Local>,
    /// The primary window the classification rules used.
    pub primary_window: usize,
    pub index: IndexAssessment,
    /// One outcome per configured security, in configuration order.
    pub securities: Vec<SecurityOutcome>,
}

/// Run one monitoring pass.
///
/// Securities are evaluated on the rayon pool; the output order is the
/// configuration order regardless of completion order.
pub fn run_monitor(
    config: &MonitorConfig,
    bars: &dyn BarProvider,
    flows: &dyn FlowProvider,
    progress: Option<&dyn FetchProgress>,
) -> Result<MonitorReport, RunError> {
    let generated_at = Local::now();
    let today = generated_at.date_naive();
    let bar_start = today - chrono::Duration::days(config.monitor.history_days);
    let flow_start = today - chrono::Duration::days(config.flow.lookback_days);

    let index_calc = SnapshotCalculator::new(
        &[config.monitor.primary_window],
        config.monitor.volume_window,
    )
    .with_crossover_detection();
    let security_calc = SnapshotCalculator::new(
        &[config.monitor.primary_window],
        config.monitor.volume_window,
    );

    // Index first: nothing downstream is meaningful without it.
    let index_symbol = &config.monitor.index_symbol;
    let total = config.monitor.securities.len() + 1;
    if let Some(p) = progress {
        p.on_start(index_symbol, 0, total);
    }
    let fetched = bars.fetch_bars(index_symbol, bar_start, today);
    if let Some(p) = progress {
        p.on_complete(index_symbol, 0, total, &fetched.as_ref().map(|_| ()).map_err(clone_err));
    }
    let raw = fetched.map_err(|source| RunError::IndexData {
        symbol: index_symbol.clone(),
        source,
    })?;
    let series = to_series(index_symbol, raw)?;
    let snapshot = index_calc.compute(&series)?;
    let bullish = snapshot
        .is_above_ma(config.monitor.primary_window)
        .unwrap_or(false);
    let index = IndexAssessment {
        symbol: index_symbol.clone(),
        snapshot,
        bullish,
    };

    let securities: Vec<SecurityOutcome> = config
        .monitor
        .securities
        .par_iter()
        .enumerate()
        .map(|(i, spec)| {
            if let Some(p) = progress {
                p.on_start(&spec.symbol, i + 1, total);
            }
            let outcome = evaluate_security(
                spec,
                &index.snapshot,
                &security_calc,
                config,
                bars,
                flows,
                bar_start,
                flow_start,
                today,
            );
            if let Some(p) = progress {
                let result = match &outcome {
                    SecurityOutcome::Evaluated(_) => Ok(()),
                    SecurityOutcome::Unavailable { reason, .. } => {
                        Err(DataError::Other(reason.clone()))
                    }
                };
                p.on_complete(&spec.symbol, i + 1, total, &result);
            }
            outcome
        })
        .collect();

    Ok(MonitorReport {
        generated_at,
        primary_window: config.monitor.primary_window,
        index,
        securities,
    })
}

#[allow(clippy::too_many_arguments)]
fn evaluate_security(
    spec: &SecuritySpec,
    index_snapshot: &IndicatorSnapshot,
    calc: &SnapshotCalculator,
    config: &MonitorConfig,
    bars: &dyn BarProvider,
    flows: &dyn FlowProvider,
    bar_start: NaiveDate,
    flow_start: NaiveDate,
    today: NaiveDate,
) -> SecurityOutcome {
    let unavailable = |reason: String| SecurityOutcome::Unavailable {
        symbol: spec.symbol.clone(),
        name: spec.name.clone(),
        reason,
    };

    let raw = match bars.fetch_bars(&spec.symbol, bar_start, today) {
        Ok(raw) => raw,
        Err(e) => return unavailable(e.to_string()),
    };
    let series = match to_series(&spec.symbol, raw) {
        Ok(series) => series,
        Err(e) => return unavailable(e.to_string()),
    };
    let snapshot = match calc.compute(&series) {
        Ok(snapshot) => snapshot,
        Err(e) => return unavailable(e.to_string()),
    };

    // Flow trouble is not fatal: the classifier has an explicit
    // flow-unknown state that must not be conflated with net-sell.
    let flow = flows
        .fetch_flows(&spec.symbol, flow_start, today)
        .ok()
        .and_then(|rows| net_flow(&rows).ok());

    let label = classify(
        index_snapshot,
        &snapshot,
        flow.as_ref(),
        config.monitor.primary_window,
        &config.thresholds,
    );

    SecurityOutcome::Evaluated(SecurityAssessment {
        symbol: spec.symbol.clone(),
        name: spec.name.clone(),
        snapshot,
        net_flow: flow,
        label,
    })
}

fn to_series(symbol: &str, raw: Vec<RawBar>) -> Result<TimeSeries, SeriesError> {
    let bars = raw
        .into_iter()
        .map(|b| Bar {
            date: b.date,
            close: b.close,
            volume: b.volume,
        })
        .collect();
    TimeSeries::new(symbol, bars)
}

/// DataError is not Clone; progress callbacks only need the rendering.
fn clone_err(e: &DataError) -> DataError {
    DataError::Other(e.to_string())
}
