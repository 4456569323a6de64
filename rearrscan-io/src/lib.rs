//! # File adapters for rearrscan
//!
//! Everything that touches the file system lives here: blacklists in BED
//! format, alignments in indexed BAM files, and the report and export
//! written at the end of a run.
//!
pub mod bam;
pub mod bed;
pub mod error;
pub mod export;
pub mod report;
pub mod utils;

pub use error::{RearrscanIoError, Result};
