//! # Correlation Engine
//!
//! Wires the market data provider, the analytics crate and the result cache
//! into a single correlation cycle.
//!
//! ## Architectural Principles
//!
//! - **Bounded Fan-Out:** One task per asset, capped by a semaphore, each
//!   request under its own deadline. A slow or failing asset degrades to an
//!   empty history; it never stalls or aborts the cycle.
//! - **All or Nothing:** If the universe fetch or the fan-out itself fails, the
//!   cycle yields `CorrelationOutcome::Unavailable` and no partial matrix.
//! - **Cache First:** `run` serves a fresh cached report before doing any I/O.
//!
//! ## Public API
//!
//! - `CorrelationPipeline`: the orchestrator (`run`, `refresh`, `compute`).
//! - `CorrelationOutcome` / `ReportSource`: the tagged cycle result.
//! - `fetch_histories` / `FetchLimits`: the concurrent history fetch.
//! - `reduce`: matrix, coverage filter and ranking over fetched data.

pub mod error;
pub mod fetch;
pub mod outcome;
pub mod pipeline;

pub use error::EngineError;
pub use fetch::{fetch_histories, FetchLimits};
pub use outcome::{CorrelationOutcome, ReportSource};
pub use pipeline::{reduce, CorrelationPipeline, PipelineConfig};
