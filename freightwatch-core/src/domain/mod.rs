//! Domain types for FreightWatch.

pub mod bar;
pub mod flow;
pub mod series;

pub use bar::Bar;
pub use flow::{FlowRow, NetFlow};
pub use series::{SeriesError, TimeSeries};

/// Symbol type alias
pub type Symbol = String;
