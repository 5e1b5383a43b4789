//! FreightWatch Runner — one monitoring pass from providers to notification.
//!
//! This crate builds on `freightwatch-core` to provide:
//! - TOML configuration for the watch list, windows, and thresholds
//! - Data provider traits with Yahoo chart API and FinMind implementations
//! - The per-run evaluation orchestrator (index + securities, isolated
//!   failures, stable output order)
//! - Plain-text report formatting
//! - Notification sinks (Discord webhook, stdout)
//! - CSV export of evaluation rows

pub mod config;
pub mod data;
pub mod export;
pub mod notify;
pub mod report;
pub mod runner;

pub use config::{ConfigError, FlowSection, MonitorConfig, MonitorSection, SecuritySpec};
pub use data::{
    BarProvider, DataError, FetchProgress, FinMindFlowProvider, FlowProvider, RawBar,
    StdoutProgress, YahooBarProvider,
};
pub use export::write_csv;
pub use notify::{DiscordWebhook, Notifier, NotifyError, StdoutNotifier};
pub use report::format_report;
pub use runner::{
    run_monitor, IndexAssessment, MonitorReport, RunError, SecurityAssessment, SecurityOutcome,
};
