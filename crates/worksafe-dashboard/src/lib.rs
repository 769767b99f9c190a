//! Dashboard session: wires the provider, the decision engine and the
//! historical dataset behind the manual and real-time interactions.

pub mod dashboard;
pub mod error;
pub mod history;

pub use dashboard::{load_engine, Dashboard, RealtimeOutcome};
pub use error::AppError;
pub use history::History;
