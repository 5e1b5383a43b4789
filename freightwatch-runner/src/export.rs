//! CSV export of evaluation rows.
//!
//! One row per configured security. Unavailable securities export a row
//! with `UNAVAILABLE` status and empty value columns, keeping the row count
//! equal to the watch list length.

use std::io::Write;
use std::path::Path;

use crate::runner::{MonitorReport, SecurityOutcome};

pub fn write_csv_to(report: &MonitorReport, writer: impl Write) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record([
        "symbol",
        "name",
        "status",
        "label",
        "close",
        "pct_change",
        "bias",
        "volume_ratio",
        "net_flow",
        "flow_date",
    ])?;

    for outcome in &report.securities {
        match outcome {
            SecurityOutcome::Evaluated(sec) => {
                let snap = &sec.snapshot;
                w.write_record(vec![
                    sec.symbol.clone(),
                    sec.name.clone(),
                    "OK".to_string(),
                    sec.label.code().to_string(),
                    format!("{:.4}", snap.last_close),
                    format!("{:.6}", snap.pct_change_from_prev),
                    snap.bias_at(report.primary_window)
                        .map(|b| format!("{b:.6}"))
                        .unwrap_or_default(),
                    format!("{:.4}", snap.volume_ratio),
                    sec.net_flow
                        .map(|f| f.net.to_string())
                        .unwrap_or_default(),
                    sec.net_flow
                        .map(|f| f.date.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            SecurityOutcome::Unavailable { symbol, name, reason } => {
                w.write_record([
                    symbol.as_str(),
                    name.as_str(),
                    "UNAVAILABLE",
                    reason.as_str(),
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                ])?;
            }
        }
    }

    w.flush()?;
    Ok(())
}

pub fn write_csv(report: &MonitorReport, path: impl AsRef<Path>) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv_to(report, file)
}
