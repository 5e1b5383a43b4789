//! Plain-text report rendering.
//!
//! Consumes the structured [`MonitorReport`] and produces the notification
//! payload. Pure string building — delivery belongs to [`crate::notify`].

use freightwatch_core::domain::NetFlow;
use freightwatch_core::indicators::CrossDirection;
use freightwatch_core::strategy::StrategyLabel;

use crate::runner::{MonitorReport, SecurityOutcome};

/// Render a monitoring pass as Discord-flavored markdown text.
pub fn format_report(report: &MonitorReport) -> String {
    let w = report.primary_window;
    let index = &report.index;

    let mut msg = format!(
        "🚢 **Dry Bulk Shipping Monitor** ({})\n",
        report.generated_at.format("%Y-%m-%d %H:%M")
    );
    msg.push_str(&format!(
        "📊 Freight index ({}): {:.2} ({:+.2}%)\n",
        index.symbol,
        index.snapshot.last_close,
        index.snapshot.pct_change_from_prev * 100.0
    ));
    msg.push_str(&format!(
        "📈 Trend: {}\n",
        if index.bullish {
            format!("🔥 bullish (above {w}MA)")
        } else {
            format!("❄️ weak (below {w}MA)")
        }
    ));
    for crossing in &index.snapshot.crossings {
        let side = match crossing.direction {
            CrossDirection::Up => "above",
            CrossDirection::Down => "below",
        };
        msg.push_str(&format!(
            "⚡ Index crossed {side} its {}MA\n",
            crossing.window
        ));
    }
    msg.push_str("---");

    for outcome in &report.securities {
        msg.push('\n');
        msg.push_str(&format_security(outcome, w));
    }

    msg
}

fn format_security(outcome: &SecurityOutcome, primary_window: usize) -> String {
    let mut block = format!("📌 **{} ({})**", outcome.name(), outcome.symbol());

    match outcome {
        SecurityOutcome::Unavailable { reason, .. } => {
            block.push_str(&format!("\n   ⚠️ no signal available: {reason}\n"));
        }
        SecurityOutcome::Evaluated(sec) => {
            let snap = &sec.snapshot;
            block.push_str(&format!(
                "\n   Quote: {:.1} ({:+.1}%) | Bias: {}",
                snap.last_close,
                snap.pct_change_from_prev * 100.0,
                snap.bias_at(primary_window)
                    .map(|b| format!("{:+.1}%", b * 100.0))
                    .unwrap_or_else(|| "n/a".into()),
            ));
            block.push_str(&format!(
                "\n   Volume: {} lots (ratio: {:.2}x)",
                fmt_thousands(snap.last_volume / 1000),
                snap.volume_ratio
            ));
            block.push_str(&format!("\n   Flow: {}", format_flow(sec.net_flow.as_ref())));
            block.push_str(&format!(
                "\n   {} Strategy: {}\n",
                label_icon(sec.label),
                sec.label.rationale()
            ));
        }
    }

    block
}

fn format_flow(net_flow: Option<&NetFlow>) -> String {
    match net_flow {
        Some(nf) => {
            let icon = if nf.is_net_buy() { "🟢" } else { "🔴" };
            format!("{icon} institutional net {:+} lots ({})", nf.net / 1000, nf.date)
        }
        None => "⚠️ flow unavailable".into(),
    }
}

fn label_icon(label: StrategyLabel) -> &'static str {
    match label {
        StrategyLabel::Overheated => "✋",
        StrategyLabel::ResonanceVolumeSurge | StrategyLabel::Resonance => "🚀",
        StrategyLabel::SevereOversold | StrategyLabel::ContrarianAccumulation => "💎",
        StrategyLabel::VolumeDivergence => "⚠️",
        StrategyLabel::StandAside => "🧊",
        StrategyLabel::RangeBound => "➖",
    }
}

/// 1234567 → "1,234,567"
fn fmt_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
