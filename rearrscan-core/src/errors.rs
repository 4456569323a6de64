use thiserror::Error;

use crate::models::RegionsName;

#[derive(Error, Debug)]
pub enum RearrangementError {
    #[error("Argument `{0}` must be provided")]
    MissingArgument(&'static str),

    #[error("invalid region: {chrom}\t{start}-{end}")]
    InvalidRegion { chrom: String, start: u32, end: u32 },

    #[error("Impossible to allocate segment {segment} to read {read}")]
    InvalidReadName { segment: String, read: String },

    #[error("Impossible to allocate segment {segment} to read {read}")]
    InvalidReadOrder { segment: String, read: String },

    #[error("Unknown read pair named {0}")]
    UnknownReadPair(String),

    #[error("Unable to store unnamed read pair")]
    UnnamedReadPair,

    #[error("Unable to add region from chromosome {found} to store of chromosome {expected}")]
    WrongChromosome { expected: String, found: String },

    #[error("No regions named {0} in this catalog")]
    UnknownRegionName(RegionsName),

    #[error("Cannot compute SRPB, the number of mapped reads is zero")]
    NoMappedReads,

    #[error("Segment {0} has no mate position")]
    MissingMatePosition(String),

    #[error("Segment source error: {0}")]
    SegmentSource(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RearrangementError>;
