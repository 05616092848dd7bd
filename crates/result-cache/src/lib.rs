//! # Result Cache
//!
//! Persists the last computed `CorrelationReport` in a single keyed slot with a
//! freshness window, so a page load can skip the fetch-and-correlate cycle.
//!
//! ## Architectural Principles
//!
//! - **Injectable Seams:** Storage (`CacheStore`) and time (`Clock`) are traits,
//!   so tests run against `MemoryStore` and `ManualClock`.
//! - **Miss, Never Fail:** A payload that is stale, unreadable or structurally
//!   invalid is deleted and reported as a miss. Reads never return an error.
//! - **Wholesale Writes:** Every `put` replaces the slot entirely.
//!
//! ## Public API
//!
//! - `ResultCache`: the TTL-aware cache over a store and a clock.
//! - `CacheEntry`: the persisted `{ timestamp, data }` envelope.
//! - `CacheStore`, `FileStore`, `MemoryStore`: raw payload storage.
//! - `Clock`, `SystemClock`, `ManualClock`: time sources.
//! - `CacheError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cache;
pub mod clock;
pub mod error;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use cache::{CacheEntry, ResultCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CacheError;
pub use store::{CacheStore, FileStore, MemoryStore};
