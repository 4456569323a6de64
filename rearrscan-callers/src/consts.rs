use rearrscan_core::repositories::ReadQuery;

pub const SRPB_THRESHOLD: f64 = 20.0;
pub const MINIMUM_MAPQ: u8 = 10;

/// Width of the bins mate positions are counted in
pub const BIN_SIZE: u32 = 1000;

/// Regions seen fewer times than this are dropped before merging
pub const MINIMUM_REGION_COUNT: u32 = 2;

/// Segments ignored when classifying reads across a region pair
pub const READS_EXCLUSIONS: [ReadQuery; 3] = [ReadQuery::Duplicate, ReadQuery::NotPaired, ReadQuery::QcFail];

/// Segments ignored when looking for candidate partner regions
pub const CANDIDATE_EXCLUSIONS: [ReadQuery; 4] = [
    ReadQuery::Duplicate,
    ReadQuery::NotPaired,
    ReadQuery::ProperPair,
    ReadQuery::QcFail,
];
