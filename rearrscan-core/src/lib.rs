//! # Core models for rearrangement evidence.
//!
//! This crate holds the value types the callers work on ([`GenomicRegion`](models::GenomicRegion),
//! [`CompoundRegion`](models::CompoundRegion), [`PlacedSegment`](models::PlacedSegment)), the
//! mutable bookkeeping of reads and read pairs, the per-call scratch stores, and the contracts of
//! the collaborators that feed segments and regions into the callers.
//!
pub mod catalog;
pub mod errors;
pub mod memory;
pub mod models;
pub mod notifications;
pub mod repositories;
pub mod stores;

// re-expose the most used items
pub use errors::*;
pub use models::*;
