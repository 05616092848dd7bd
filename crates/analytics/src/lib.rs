//! # Correlation Analytics
//!
//! This crate turns per-asset price histories into a pruned, ranked correlation
//! matrix. It is the computational heart of the workspace.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no async. It depends only on `core-types`.
//!   Fetching, caching and orchestration live in `engine`.
//! - **Never Fails:** Missing or short histories are not errors. They surface as
//!   low-data cells, which the coverage filter later prunes.
//!
//! ## Public API
//!
//! - `compute_returns`: closes to simple returns.
//! - `correlate` / `correlate_with_min_overlap`: the Pearson calculator.
//! - `build_matrix`: the full pairwise pass.
//! - `filter_by_coverage`: drops assets whose row is mostly low-data.
//! - `rank_by_volume`: orders assets by open interest times price.

pub mod correlation;
pub mod coverage;
pub mod matrix;
pub mod params;
pub mod ranking;
pub mod returns;

pub use correlation::{correlate, correlate_with_min_overlap, MIN_OVERLAP};
pub use coverage::filter_by_coverage;
pub use matrix::build_matrix;
pub use params::AnalysisParams;
pub use ranking::{rank_by_volume, volume_proxy};
pub use returns::compute_returns;
