//! Strategy labels and their rationale strings.

use serde::{Deserialize, Serialize};

/// The mutually-exclusive classification for one (index, security) pair.
///
/// Exactly one label is produced per evaluation; mutual exclusion comes from
/// the ordered rule table in [`crate::strategy::classify`], not from the
/// predicates themselves (several overlap by design).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyLabel {
    /// Bullish confluence but price extended above its average.
    Overheated,
    /// Index and flow bullish with unusual volume expansion.
    ResonanceVolumeSurge,
    /// Index and flow bullish.
    Resonance,
    /// Index weak, institutions buying, price far below its average.
    SevereOversold,
    /// Index weak but institutions buying.
    ContrarianAccumulation,
    /// Price rising on shrinking volume.
    VolumeDivergence,
    /// Index weak and flow non-positive.
    StandAside,
    /// Nothing actionable.
    RangeBound,
}

impl StrategyLabel {
    /// Human-readable rationale attached to the label.
    pub fn rationale(&self) -> &'static str {
        match self {
            Self::Overheated => "bullish confluence but price extended; avoid chasing",
            Self::ResonanceVolumeSurge => "dual-bullish resonance with volume expansion",
            Self::Resonance => "dual-bullish resonance",
            Self::SevereOversold => "severe oversold with institutional accumulation",
            Self::ContrarianAccumulation => "contrarian accumulation; watch for support",
            Self::VolumeDivergence => "price up on shrinking volume; momentum doubt",
            Self::StandAside => "index and institutional flow both weak; stand aside",
            Self::RangeBound => "range-bound; no actionable signal",
        }
    }

    /// Short stable identifier for CSV export and report tagging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Overheated => "OVERHEATED",
            Self::ResonanceVolumeSurge => "RESONANCE_VOLUME_SURGE",
            Self::Resonance => "RESONANCE",
            Self::SevereOversold => "SEVERE_OVERSOLD",
            Self::ContrarianAccumulation => "CONTRARIAN_ACCUMULATION",
            Self::VolumeDivergence => "VOLUME_DIVERGENCE",
            Self::StandAside => "STAND_ASIDE",
            Self::RangeBound => "RANGE_BOUND",
        }
    }
}

impl std::fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rationale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let all = [
            StrategyLabel::Overheated,
            StrategyLabel::ResonanceVolumeSurge,
            StrategyLabel::Resonance,
            StrategyLabel::SevereOversold,
            StrategyLabel::ContrarianAccumulation,
            StrategyLabel::VolumeDivergence,
            StrategyLabel::StandAside,
            StrategyLabel::RangeBound,
        ];
        let mut codes: Vec<&str> = all.iter().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn display_matches_rationale() {
        let label = StrategyLabel::StandAside;
        assert_eq!(label.to_string(), label.rationale());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&StrategyLabel::ResonanceVolumeSurge).unwrap();
        assert_eq!(json, "\"RESONANCE_VOLUME_SURGE\"");
    }
}
