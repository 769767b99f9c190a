//! Historical weather dataset and chart series for the dashboard.
//!
//! The dataset is read-only and feeds visualizations only; the decision
//! pipeline never reads it.

pub mod chart;
pub mod dataset;
pub mod error;

pub use chart::{build_all, build_chart, Chart, ChartKind, TimePoint};
pub use dataset::{columns, Dataset, LocationView, Table};
pub use error::DatasetError;
