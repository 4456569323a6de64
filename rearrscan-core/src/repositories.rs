//!
//! Contracts of the collaborators that feed the callers: where segments come
//! from, how many reads there are, and where named regions are looked up.
//!
use std::cell::RefCell;
use std::collections::BTreeSet;

use fxhash::FxHashMap as HashMap;

use crate::errors::Result;
use crate::models::segment::flags;
use crate::models::{AlignmentRecord, CompoundRegion, GenomicRegions, PlacedSegment, RegionsName};

/// Alignment flag filters understood by segment sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadQuery {
    Duplicate,
    NotPaired,
    ProperPair,
    NotProperPair,
    QcFail,
    Secondary,
    Supplementary,
    Unmapped,
}

impl ReadQuery {
    /// True if a record with these flags is selected by the query
    pub fn selects_flags(&self, bits: u16) -> bool {
        match self {
            ReadQuery::Duplicate => bits & flags::DUPLICATE != 0,
            ReadQuery::NotPaired => bits & flags::PAIRED == 0,
            ReadQuery::ProperPair => bits & flags::PROPER_PAIR != 0,
            ReadQuery::NotProperPair => bits & flags::PROPER_PAIR == 0,
            ReadQuery::QcFail => bits & flags::QC_FAIL != 0,
            ReadQuery::Secondary => bits & flags::SECONDARY != 0,
            ReadQuery::Supplementary => bits & flags::SUPPLEMENTARY != 0,
            ReadQuery::Unmapped => bits & flags::UNMAPPED != 0,
        }
    }

    pub fn selects(&self, record: &AlignmentRecord) -> bool {
        self.selects_flags(record.flags)
    }
}

/// True if none of `exclude` selects the record
pub fn passes_exclusions(record: &AlignmentRecord, exclude: &[ReadQuery]) -> bool {
    !exclude.iter().any(|query| query.selects(record))
}

/// Records a counter skips when no exclusion set is given
pub const DEFAULT_COUNT_EXCLUSIONS: [ReadQuery; 5] = [
    ReadQuery::Unmapped,
    ReadQuery::Secondary,
    ReadQuery::QcFail,
    ReadQuery::Duplicate,
    ReadQuery::Supplementary,
];

pub type SegmentIter<'a> = Box<dyn Iterator<Item = Result<PlacedSegment>> + 'a>;

pub trait SegmentCounter {
    ///
    /// Count the records of the source that none of `exclude` selects.
    /// `None` means [DEFAULT_COUNT_EXCLUSIONS].
    ///
    fn count_segments(&self, exclude: Option<&[ReadQuery]>) -> Result<u64>;
}

///
/// A source of [PlacedSegment]s.
///
/// `fetch` returns a single pass iterator; every segment it yields carries
/// the whole queried region set as its location.
///
pub trait SegmentRepository: SegmentCounter {
    fn fetch<'a>(
        &'a self,
        locations: &GenomicRegions,
        exclude: &[ReadQuery],
        min_quality: u8,
    ) -> Result<SegmentIter<'a>>;

    /// The mate alignment of `segment`, if the source has one
    fn mate_of(&self, segment: &PlacedSegment) -> Result<Option<PlacedSegment>>;

    /// Chromosome and 1-based position of the mate of `segment`
    fn mate_exact_position(&self, segment: &PlacedSegment) -> Result<(String, u32)>;
}

pub trait RegionCatalog {
    fn get(&self, name: RegionsName) -> Result<CompoundRegion>;
}

/// A counter that always answers with a value known in advance
#[derive(Debug, Clone, Copy)]
pub struct ProvidedSegmentCounter {
    count: u64,
}

impl ProvidedSegmentCounter {
    pub fn new(count: u64) -> Self {
        ProvidedSegmentCounter { count }
    }
}

impl SegmentCounter for ProvidedSegmentCounter {
    fn count_segments(&self, _exclude: Option<&[ReadQuery]>) -> Result<u64> {
        Ok(self.count)
    }
}

///
/// Memoises the answers of another counter by exclusion set. Entries live as
/// long as the counter does.
///
pub struct CachedSegmentCounter {
    counter: Box<dyn SegmentCounter>,
    cache: RefCell<HashMap<Option<BTreeSet<ReadQuery>>, u64>>,
}

impl CachedSegmentCounter {
    pub fn new(counter: Box<dyn SegmentCounter>) -> Self {
        CachedSegmentCounter {
            counter,
            cache: RefCell::new(HashMap::default()),
        }
    }
}

impl SegmentCounter for CachedSegmentCounter {
    fn count_segments(&self, exclude: Option<&[ReadQuery]>) -> Result<u64> {
        let key = exclude.map(|queries| queries.iter().copied().collect::<BTreeSet<_>>());
        if let Some(count) = self.cache.borrow().get(&key) {
            return Ok(*count);
        }
        let count = self.counter.count_segments(exclude)?;
        self.cache.borrow_mut().insert(key, count);
        Ok(count)
    }
}
