//! FreightWatch Core — the market-monitoring engine.
//!
//! This crate contains everything with actual decision logic:
//! - Domain types (daily bars, immutable time series, institutional flow rows)
//! - Indicator snapshot calculator (moving averages, percentage change, bias,
//!   volume ratio, moving-average crossover detection)
//! - Net-flow aggregation over the latest reporting date
//! - Ordered, first-match-wins strategy classification
//!
//! The crate is I/O-free: no network, file, or environment access. Data
//! providers and notification sinks live in `freightwatch-runner`.

pub mod domain;
pub mod flow;
pub mod indicators;
pub mod strategy;
