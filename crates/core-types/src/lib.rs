//! Shared data structures for the correlation workspace.
//!
//! Every other crate speaks in these types: the `api-client` produces `Asset`s
//! and `PriceSeries`, `analytics` turns them into a `CorrelationMatrix`, and the
//! `result-cache` persists the final `CorrelationReport`.

pub mod asset;
pub mod matrix;
pub mod report;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use asset::Asset;
pub use matrix::{CorrelationCell, CorrelationMatrix};
pub use report::CorrelationReport;
pub use series::PriceSeries;
