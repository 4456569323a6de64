use std::collections::BTreeSet;
use std::rc::Rc;

use rearrscan_core::errors::Result;
use rearrscan_core::repositories::SegmentRepository;
use rearrscan_core::stores::RegionStore;
use rearrscan_core::{CompoundRegion, GenomicRegion};

use crate::consts::{BIN_SIZE, CANDIDATE_EXCLUSIONS, MINIMUM_REGION_COUNT};
use crate::selectors::RegionSelector;

/// True if `b` overlaps `a` or starts right after it
pub fn are_contiguous(a: &GenomicRegion, b: &GenomicRegion) -> bool {
    a.chrom == b.chrom && a.end.saturating_add(1) >= b.start
}

///
/// Splits a sequence of regions, sorted by chromosome and start, into blocks
/// of contiguous regions. Blocks always hold at least two regions; isolated
/// regions are never yielded.
///
/// The finder consumes its input, so every scan needs a fresh finder.
///
pub struct ContiguousRegionFinder<I>
where
    I: Iterator<Item = GenomicRegion>,
{
    regions: I,
    block: Vec<GenomicRegion>,
}

impl<I> ContiguousRegionFinder<I>
where
    I: Iterator<Item = GenomicRegion>,
{
    pub fn new(regions: I) -> Self {
        ContiguousRegionFinder {
            regions,
            block: Vec::new(),
        }
    }
}

impl<I> Iterator for ContiguousRegionFinder<I>
where
    I: Iterator<Item = GenomicRegion>,
{
    type Item = Vec<GenomicRegion>;

    fn next(&mut self) -> Option<Self::Item> {
        for region in self.regions.by_ref() {
            let extends_block = self
                .block
                .last()
                .is_none_or(|last| are_contiguous(last, &region));
            if extends_block {
                self.block.push(region);
                continue;
            }
            let block = std::mem::replace(&mut self.block, vec![region]);
            if block.len() >= 2 {
                return Some(block);
            }
        }
        let block = std::mem::take(&mut self.block);
        (block.len() >= 2).then_some(block)
    }
}

///
/// Counts regions, then drops rare ones and merges contiguous survivors.
///
#[derive(Debug, Default)]
pub struct RegionConsolidationService {
    store: RegionStore,
}

impl RegionConsolidationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, region: GenomicRegion) -> Result<()> {
        self.store.add(region)
    }

    pub fn regions(&self) -> Vec<GenomicRegion> {
        self.store.regions()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Low-pass filter first, then merge
    pub fn consolidate(&mut self) -> Result<()> {
        self.low_pass_filter();
        self.merge_contiguous_regions()
    }

    fn low_pass_filter(&mut self) {
        let rare: Vec<GenomicRegion> = self
            .store
            .counted_regions()
            .into_iter()
            .filter(|(_, count)| *count < MINIMUM_REGION_COUNT)
            .map(|(region, _)| region)
            .collect();
        for region in rare.iter() {
            self.store.delete(region);
        }
    }

    fn merge_contiguous_regions(&mut self) -> Result<()> {
        let blocks: Vec<Vec<GenomicRegion>> =
            ContiguousRegionFinder::new(self.store.regions().into_iter()).collect();

        for block in blocks {
            let (Some(first), Some(last)) = (block.first(), block.last()) else {
                continue;
            };
            let merged = GenomicRegion::new(first.chrom.clone(), first.start, last.end);
            for region in block.iter() {
                self.store.delete(region);
            }
            log::debug!("merged {} regions into {}", block.len(), merged);
            self.store.add(merged)?;
        }
        Ok(())
    }
}

/// The fixed width bin holding a 1-based position
pub fn bin_of(chrom: &str, position: u32) -> GenomicRegion {
    let low = position / BIN_SIZE * BIN_SIZE + 1;
    GenomicRegion::new(chrom, low, low + BIN_SIZE - 1)
}

///
/// Finds regions where the mates of reads aligned to a bait region cluster.
///
/// Every mate position is put in a 1000 bp bin; bins passing all selectors
/// are counted and consolidated.
///
pub struct CandidateRegionCaller {
    repository: Rc<dyn SegmentRepository>,
    selectors: Vec<Box<dyn RegionSelector>>,
    consolidation: RegionConsolidationService,
}

impl CandidateRegionCaller {
    pub fn new(repository: Rc<dyn SegmentRepository>, selectors: Vec<Box<dyn RegionSelector>>) -> Self {
        CandidateRegionCaller {
            repository,
            selectors,
            consolidation: RegionConsolidationService::new(),
        }
    }

    pub fn get_candidates_regions(&mut self, bait: &CompoundRegion) -> Result<BTreeSet<GenomicRegion>> {
        self.consolidation.clear();

        for segment in self.repository.fetch(&bait.regions, &CANDIDATE_EXCLUSIONS, 0)? {
            let segment = segment?;
            let (chrom, position) = self.repository.mate_exact_position(&segment)?;
            let bin = bin_of(&chrom, position);
            if self.is_selected(&bin)? {
                self.consolidation.add(bin)?;
            }
        }

        self.consolidation.consolidate()?;
        let candidates: BTreeSet<GenomicRegion> = self.consolidation.regions().into_iter().collect();
        log::debug!("{} candidate regions found around {}", candidates.len(), bait.name);
        Ok(candidates)
    }

    fn is_selected(&self, region: &GenomicRegion) -> Result<bool> {
        for selector in self.selectors.iter() {
            if !selector.select(region)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
