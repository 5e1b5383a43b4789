//! Serializable monitor configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use freightwatch_core::strategy::Thresholds;

/// Errors from config loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One monitored security: the symbol the bar provider understands plus a
/// display name for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySpec {
    pub symbol: String,
    pub name: String,
}

/// The `[monitor]` section: what to watch and over which windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSection {
    /// Symbol of the freight-rate index proxy.
    pub index_symbol: String,

    /// Moving-average window used by the classification rules.
    #[serde(default = "default_primary_window")]
    pub primary_window: usize,

    /// Window for the volume moving average behind the volume ratio.
    #[serde(default = "default_volume_window")]
    pub volume_window: usize,

    /// Calendar days of bar history to request from the provider.
    #[serde(default = "default_history_days")]
    pub history_days: i64,

    /// Securities to evaluate, in report order.
    pub securities: Vec<SecuritySpec>,
}

fn default_primary_window() -> usize {
    20
}
fn default_volume_window() -> usize {
    5
}
fn default_history_days() -> i64 {
    60
}

/// The `[flow]` section: institutional-flow fetch behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSection {
    /// Trailing calendar days of flow rows to request, absorbing provider
    /// reporting lag. The aggregator picks the latest date present.
    #[serde(default = "default_flow_lookback_days")]
    pub lookback_days: i64,
}

fn default_flow_lookback_days() -> i64 {
    7
}

impl Default for FlowSection {
    fn default() -> Self {
        Self {
            lookback_days: default_flow_lookback_days(),
        }
    }
}

/// The `[notify]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifySection {
    /// Discord-compatible webhook URL. When absent the report goes to
    /// stdout. May also be supplied via environment at the CLI boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// Complete monitor configuration, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub monitor: MonitorSection,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub flow: FlowSection,

    #[serde(default)]
    pub notify: NotifySection,
}

impl MonitorConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.monitor;
        if m.index_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("index_symbol is empty".into()));
        }
        if m.securities.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one [[monitor.securities]] entry is required".into(),
            ));
        }
        if m.primary_window < 1 {
            return Err(ConfigError::Invalid("primary_window must be >= 1".into()));
        }
        if m.volume_window < 1 {
            return Err(ConfigError::Invalid("volume_window must be >= 1".into()));
        }
        // Crossover detection needs the MA one bar before the latest; keep a
        // margin over trading-day gaps in the calendar-day fetch window.
        let max_window = m.primary_window.max(m.volume_window) as i64;
        if m.history_days < max_window + 2 {
            return Err(ConfigError::Invalid(format!(
                "history_days = {} cannot cover the {max_window}-bar window plus crossover lookback",
                m.history_days
            )));
        }
        if self.flow.lookback_days < 1 {
            return Err(ConfigError::Invalid("flow.lookback_days must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[monitor]
index_symbol = "BDRY"

[[monitor.securities]]
symbol = "2606.TW"
name = "U-Ming"
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = MonitorConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.monitor.index_symbol, "BDRY");
        assert_eq!(config.monitor.primary_window, 20);
        assert_eq!(config.monitor.volume_window, 5);
        assert_eq!(config.monitor.history_days, 60);
        assert_eq!(config.flow.lookback_days, 7);
        assert_eq!(config.notify.webhook_url, None);
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn full_config_round_trips() {
        let raw = r#"
[monitor]
index_symbol = "BDRY"
primary_window = 20
volume_window = 5
history_days = 90

[[monitor.securities]]
symbol = "2606.TW"
name = "U-Ming"

[[monitor.securities]]
symbol = "2637.TW"
name = "Wisdom Marine"

[thresholds]
overheated_bias = 0.08
oversold_bias = -0.10

[flow]
lookback_days = 10

[notify]
webhook_url = "https://discord.com/api/webhooks/x/y"
"#;
        let config = MonitorConfig::from_toml(raw).unwrap();
        assert_eq!(config.monitor.securities.len(), 2);
        assert_eq!(config.thresholds.overheated_bias, 0.08);
        assert_eq!(config.thresholds.oversold_bias, -0.10);
        // Unset threshold fields keep their defaults.
        assert_eq!(config.thresholds.volume_surge_ratio, 1.2);
        assert_eq!(config.flow.lookback_days, 10);
        assert!(config.notify.webhook_url.is_some());

        let rendered = toml::to_string(&config).unwrap();
        let reparsed = MonitorConfig::from_toml(&rendered).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn rejects_empty_security_list() {
        let raw = r#"
[monitor]
index_symbol = "BDRY"
securities = []
"#;
        let err = MonitorConfig::from_toml(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_blank_index_symbol() {
        let raw = r#"
[monitor]
index_symbol = " "

[[monitor.securities]]
symbol = "2606.TW"
name = "U-Ming"
"#;
        assert!(MonitorConfig::from_toml(raw).is_err());
    }

    #[test]
    fn rejects_history_shorter_than_window() {
        let raw = r#"
[monitor]
index_symbol = "BDRY"
history_days = 10

[[monitor.securities]]
symbol = "2606.TW"
name = "U-Ming"
"#;
        let err = MonitorConfig::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("history_days"));
    }

    #[test]
    fn rejects_zero_window() {
        let raw = r#"
[monitor]
index_symbol = "BDRY"
primary_window = 0
history_days = 60

[[monitor.securities]]
symbol = "2606.TW"
name = "U-Ming"
"#;
        assert!(MonitorConfig::from_toml(raw).is_err());
    }

    #[test]
    fn parse_error_is_reported_as_parse() {
        let err = MonitorConfig::from_toml("not = [valid").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
