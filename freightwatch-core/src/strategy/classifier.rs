//! Ordered rule-table classifier.

use serde::{Deserialize, Serialize};

use crate::domain::NetFlow;
use crate::indicators::IndicatorSnapshot;

use super::label::StrategyLabel;

/// Tunable rule thresholds.
///
/// The defaults are the canonical values; deployments disagree on the exact
/// overheated/oversold cut-offs, so they are configuration rather than
/// constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Security bias above which a bullish confluence is "too extended".
    #[serde(default = "default_overheated_bias")]
    pub overheated_bias: f64,
    /// Security bias below which a weak index plus buying is "severe oversold".
    #[serde(default = "default_oversold_bias")]
    pub oversold_bias: f64,
    /// Volume ratio above which a resonance counts as volume expansion.
    #[serde(default = "default_volume_surge_ratio")]
    pub volume_surge_ratio: f64,
    /// Day change above which a shrinking-volume rally raises momentum doubt.
    #[serde(default = "default_divergence_change")]
    pub divergence_change: f64,
    /// Volume ratio below which volume counts as shrinking.
    #[serde(default = "default_divergence_volume_ratio")]
    pub divergence_volume_ratio: f64,
}

fn default_overheated_bias() -> f64 {
    0.10
}
fn default_oversold_bias() -> f64 {
    -0.08
}
fn default_volume_surge_ratio() -> f64 {
    1.2
}
fn default_divergence_change() -> f64 {
    0.015
}
fn default_divergence_volume_ratio() -> f64 {
    0.7
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            overheated_bias: default_overheated_bias(),
            oversold_bias: default_oversold_bias(),
            volume_surge_ratio: default_volume_surge_ratio(),
            divergence_change: default_divergence_change(),
            divergence_volume_ratio: default_divergence_volume_ratio(),
        }
    }
}

/// The flattened state a rule predicate sees.
///
/// `index_bullish` is `None` when the primary window was absent from the
/// index snapshot; index-regime rules then match neither the bullish nor the
/// bearish leg. `flow` is `None` when institutional flow is unknown, which
/// must not be conflated with a negative reading.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub index_bullish: Option<bool>,
    pub flow: Option<i64>,
    pub security_bias: Option<f64>,
    pub security_volume_ratio: f64,
    pub security_pct_change: f64,
}

impl RuleContext {
    fn index_bullish(&self) -> bool {
        self.index_bullish == Some(true)
    }

    fn index_bearish(&self) -> bool {
        self.index_bullish == Some(false)
    }

    fn net_buy(&self) -> bool {
        matches!(self.flow, Some(net) if net > 0)
    }

    /// Known and non-positive. Unknown flow is neither positive nor
    /// non-positive.
    fn flow_nonpositive(&self) -> bool {
        matches!(self.flow, Some(net) if net <= 0)
    }

    fn bias_above(&self, threshold: f64) -> bool {
        matches!(self.security_bias, Some(b) if b > threshold)
    }

    fn bias_below(&self, threshold: f64) -> bool {
        matches!(self.security_bias, Some(b) if b < threshold)
    }
}

struct Rule {
    label: StrategyLabel,
    applies: fn(&RuleContext, &Thresholds) -> bool,
}

/// The canonical precedence table, highest priority first. The first rule
/// whose predicate holds determines the label; later rules are not
/// evaluated. Reordering this table changes outcomes on overlapping
/// conditions.
const RULES: &[Rule] = &[
    Rule {
        label: StrategyLabel::Overheated,
        applies: |ctx, t| ctx.index_bullish() && ctx.net_buy() && ctx.bias_above(t.overheated_bias),
    },
    Rule {
        label: StrategyLabel::ResonanceVolumeSurge,
        applies: |ctx, t| {
            ctx.index_bullish() && ctx.net_buy() && ctx.security_volume_ratio > t.volume_surge_ratio
        },
    },
    Rule {
        label: StrategyLabel::Resonance,
        applies: |ctx, _| ctx.index_bullish() && ctx.net_buy(),
    },
    Rule {
        label: StrategyLabel::SevereOversold,
        applies: |ctx, t| ctx.index_bearish() && ctx.net_buy() && ctx.bias_below(t.oversold_bias),
    },
    Rule {
        label: StrategyLabel::ContrarianAccumulation,
        applies: |ctx, _| ctx.index_bearish() && ctx.net_buy(),
    },
    Rule {
        label: StrategyLabel::VolumeDivergence,
        applies: |ctx, t| {
            ctx.security_pct_change > t.divergence_change
                && ctx.security_volume_ratio < t.divergence_volume_ratio
        },
    },
    Rule {
        label: StrategyLabel::StandAside,
        applies: |ctx, _| ctx.flow_nonpositive() && ctx.index_bearish(),
    },
    Rule {
        label: StrategyLabel::RangeBound,
        applies: |_, _| true,
    },
];

/// Classify one (index, security) evaluation into a single label.
///
/// Never fails: missing preconditions (insufficient history, undefined
/// bias) are the caller's problem and abort the per-security evaluation
/// before this point. `net_flow: None` is the explicit flow-unknown state.
pub fn classify(
    index: &IndicatorSnapshot,
    security: &IndicatorSnapshot,
    net_flow: Option<&NetFlow>,
    primary_window: usize,
    thresholds: &Thresholds,
) -> StrategyLabel {
    let ctx = RuleContext {
        index_bullish: index.is_above_ma(primary_window),
        flow: net_flow.map(|f| f.net),
        security_bias: security.bias_at(primary_window),
        security_volume_ratio: security.volume_ratio,
        security_pct_change: security.pct_change_from_prev,
    };
    classify_context(&ctx, thresholds)
}

/// Walk the ordered rule table; total because the last rule always matches.
pub fn classify_context(ctx: &RuleContext, thresholds: &Thresholds) -> StrategyLabel {
    RULES
        .iter()
        .find(|rule| (rule.applies)(ctx, thresholds))
        .map(|rule| rule.label)
        .expect("rule table ends with a catch-all")
}
