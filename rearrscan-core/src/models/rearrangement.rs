use std::collections::BTreeSet;

use crate::models::compound_region::CompoundRegionPair;
use crate::models::segment::PlacedSegment;

/// Distinct read pair tallies for one region pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifiedSegmentCount {
    pub paired: usize,
    pub split: usize,
    pub spanning: usize,
}

impl ClassifiedSegmentCount {
    pub fn new(paired: usize, split: usize, spanning: usize) -> Self {
        ClassifiedSegmentCount {
            paired,
            split,
            spanning,
        }
    }
}

///
/// The evidence collected for one region pair hypothesis.
///
/// `srpb` is the number of spanning read pairs per billion mapped reads.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Rearrangement {
    pub region_pair: CompoundRegionPair,
    pub counts: ClassifiedSegmentCount,
    pub srpb: f64,
    pub segments: BTreeSet<PlacedSegment>,
}

impl Rearrangement {
    pub fn new(
        region_pair: CompoundRegionPair,
        counts: ClassifiedSegmentCount,
        srpb: f64,
        segments: BTreeSet<PlacedSegment>,
    ) -> Self {
        Rearrangement {
            region_pair,
            counts,
            srpb,
            segments,
        }
    }
}

/// Spanning read pairs per billion of `total` reads
pub fn spanning_reads_per_billion(spanning: usize, total: u64) -> f64 {
    spanning as f64 * 1e9 / total as f64
}
