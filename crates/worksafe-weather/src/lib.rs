//! Weather readings and the real-time weather provider.
//!
//! Readings come either from the dashboard sliders or from the Tomorrow.io
//! timelines API; both feed the same decision pipeline.

pub mod provider;
pub mod types;

pub use provider::TomorrowClient;
pub use types::*;
