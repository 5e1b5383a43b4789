//! Strategy classification.
//!
//! An ordered, first-match-wins rule table maps the derived state of the
//! freight index and one security into a single mutually-exclusive
//! [`StrategyLabel`].

pub mod classifier;
pub mod label;

pub use classifier::{classify, classify_context, RuleContext, Thresholds};
pub use label::StrategyLabel;
