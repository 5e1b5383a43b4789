//! Data providers for the monitoring pass.
//!
//! Everything network-facing lives here, behind the [`BarProvider`] and
//! [`FlowProvider`] traits, so the runner can be exercised with in-memory
//! fakes and the core never sees an HTTP client.

pub mod finmind;
pub mod provider;
pub mod yahoo;

pub use finmind::FinMindFlowProvider;
pub use provider::{
    BarProvider, DataError, FetchProgress, FlowProvider, RawBar, StdoutProgress,
};
pub use yahoo::YahooBarProvider;
