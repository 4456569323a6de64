use crate::errors::{RearrangementError, Result};
use crate::models::{GenomicRegions, PlacedSegment};
use crate::repositories::{
    DEFAULT_COUNT_EXCLUSIONS, ReadQuery, SegmentCounter, SegmentIter, SegmentRepository,
    passes_exclusions,
};

///
/// A segment source over segments built in advance.
///
/// A stored segment is fetched when one of its location regions is part of
/// the queried set. Fetched segments are relocated to the whole queried set,
/// like the alignment file backed source does.
///
#[derive(Debug, Clone, Default)]
pub struct InMemorySegmentRepository {
    segments: Vec<PlacedSegment>,
}

impl InMemorySegmentRepository {
    pub fn new(segments: Vec<PlacedSegment>) -> Self {
        InMemorySegmentRepository { segments }
    }

    pub fn push(&mut self, segment: PlacedSegment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl SegmentCounter for InMemorySegmentRepository {
    fn count_segments(&self, exclude: Option<&[ReadQuery]>) -> Result<u64> {
        let exclude = exclude.unwrap_or(&DEFAULT_COUNT_EXCLUSIONS);
        let count = self
            .segments
            .iter()
            .filter(|segment| passes_exclusions(&segment.content, exclude))
            .count();
        Ok(count as u64)
    }
}

impl SegmentRepository for InMemorySegmentRepository {
    fn fetch<'a>(
        &'a self,
        locations: &GenomicRegions,
        exclude: &[ReadQuery],
        min_quality: u8,
    ) -> Result<SegmentIter<'a>> {
        let query = locations.clone();
        let exclude = exclude.to_vec();
        let iter = self
            .segments
            .iter()
            .filter(move |segment| {
                segment.location.iter().any(|region| query.contains(region))
                    && passes_exclusions(&segment.content, &exclude)
                    && segment.content.mapping_quality_or_zero() >= min_quality
            })
            .map({
                let locations = locations.clone();
                move |segment| -> Result<PlacedSegment> {
                    let mut fetched = segment.clone();
                    fetched.location = locations.clone();
                    Ok(fetched)
                }
            });
        Ok(Box::new(iter))
    }

    fn mate_of(&self, segment: &PlacedSegment) -> Result<Option<PlacedSegment>> {
        Ok(self
            .segments
            .iter()
            .find(|other| {
                other.read_name == segment.read_name && other.read_order == segment.read_order.mate()
            })
            .cloned())
    }

    fn mate_exact_position(&self, segment: &PlacedSegment) -> Result<(String, u32)> {
        match (&segment.content.mate_reference_name, segment.content.mate_position) {
            (Some(chrom), Some(position)) => Ok((chrom.clone(), position)),
            _ => Err(RearrangementError::MissingMatePosition(segment.read_name.clone())),
        }
    }
}
