//! # Rearrangement callers
//!
//! The callers turn segments from a [SegmentRepository](rearrscan_core::repositories::SegmentRepository)
//! into scored [Rearrangement](rearrscan_core::Rearrangement)s:
//!
//! ```text
//! RearrangementCaller
//!   -> CompoundRegionPairCaller   (which region pairs to test)
//!        -> CandidateRegionCaller (bait mode only, finds partner regions)
//!   -> ReadsCaller                (which read pairs span a region pair)
//! ```
//!
//! Callers are composed by [factories::RearrangementCallerFactory] and driven
//! by [interactor::ClassifyInteractor].
//!
pub mod consts;
pub mod factories;
pub mod interactor;
pub mod notifications;
pub mod read_callers;
pub mod rearrangement_callers;
pub mod region_callers;
pub mod region_pair_callers;
pub mod selectors;
pub mod sorters;

#[cfg(test)]
pub(crate) mod testing;
