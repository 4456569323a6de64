use std::rc::Rc;

use rearrscan_core::errors::Result;
use rearrscan_core::repositories::{SegmentIter, SegmentRepository};
use rearrscan_core::stores::PairedReadStore;
use rearrscan_core::{ClassifiedSegmentCount, GenomicRegions, PlacedSegment, ReadPair};

use crate::consts::READS_EXCLUSIONS;

pub trait ReadsCaller {
    ///
    /// Classify the read pairs spanning `a` and `b`. Any state left by a
    /// previous call is discarded first.
    ///
    fn detect_reads_spanning_regions(&mut self, a: &GenomicRegions, b: &GenomicRegions) -> Result<()>;

    fn get_segment_count(&self) -> ClassifiedSegmentCount;

    ///
    /// Every segment of the spanning read pairs found by the last call to
    /// [ReadsCaller::detect_reads_spanning_regions]. Single pass.
    ///
    fn get_segments_of_spanning_reads(&self) -> SegmentIter<'_>;
}

///
/// Finds read pairs that are split or improperly paired across two region
/// sets.
///
/// Read pairs are collected from `a` without any mapping quality floor, then
/// completed with segments from `b` that pass `min_quality`. Pairs never seen
/// in `a` are not collected from `b`.
///
pub struct SpanningReadsCaller {
    repository: Rc<dyn SegmentRepository>,
    min_quality: u8,
    store: PairedReadStore,
}

impl SpanningReadsCaller {
    pub fn new(repository: Rc<dyn SegmentRepository>, min_quality: u8) -> Self {
        SpanningReadsCaller {
            repository,
            min_quality,
            store: PairedReadStore::new(),
        }
    }

    fn collect_read_pairs(&mut self, a: &GenomicRegions, b: &GenomicRegions) -> Result<()> {
        for segment in self.repository.fetch(a, &READS_EXCLUSIONS, 0)? {
            self.store.allocate(segment?, true)?;
        }
        for segment in self.repository.fetch(b, &READS_EXCLUSIONS, self.min_quality)? {
            self.store.allocate(segment?, false)?;
        }
        Ok(())
    }

    fn classify_read_pairs(&mut self, a: &GenomicRegions, b: &GenomicRegions) -> Result<()> {
        let mut split = Vec::new();
        let mut paired = Vec::new();
        for read_pair in self.store.read_pairs() {
            let Some(name) = read_pair.name() else {
                continue;
            };
            if read_pair.has_split_read_across(a, b) {
                split.push(name.to_string());
            }
            if read_pair.has_improper_pair_across(a, b) {
                paired.push(name.to_string());
            }
        }

        for name in split.iter() {
            self.store.mark_as_split(name)?;
            self.store.mark_as_spanning(name)?;
        }
        for name in paired.iter() {
            self.store.mark_as_paired(name)?;
            self.store.mark_as_spanning(name)?;
        }
        Ok(())
    }

    ///
    /// Look up the mate of a pair with a single read. Supplementary
    /// alignments are only used when the read has nothing else.
    ///
    fn find_missing_mate(&self, read_pair: &ReadPair) -> Result<Option<PlacedSegment>> {
        let segment = read_pair
            .segments()
            .find(|segment| !segment.content.is_supplementary())
            .or_else(|| read_pair.segments().next());
        match segment {
            Some(segment) => self.repository.mate_of(segment),
            None => Ok(None),
        }
    }
}

impl ReadsCaller for SpanningReadsCaller {
    fn detect_reads_spanning_regions(&mut self, a: &GenomicRegions, b: &GenomicRegions) -> Result<()> {
        self.store.clear();
        self.collect_read_pairs(a, b)?;
        self.classify_read_pairs(a, b)?;
        log::debug!(
            "{} read pairs collected, {:?}",
            self.store.len(),
            self.store.segment_count()
        );
        Ok(())
    }

    fn get_segment_count(&self) -> ClassifiedSegmentCount {
        let (paired, split, spanning) = self.store.segment_count();
        ClassifiedSegmentCount::new(paired, split, spanning)
    }

    fn get_segments_of_spanning_reads(&self) -> SegmentIter<'_> {
        let segments = self.store.spanning_reads().flat_map(move |read_pair| {
            let mate = if read_pair.has_both_mates() {
                None
            } else {
                self.find_missing_mate(read_pair).transpose()
            };
            read_pair.segments().cloned().map(Ok).chain(mate)
        });
        Box::new(segments)
    }
}
