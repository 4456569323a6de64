use fxhash::FxHashMap as HashMap;

use rearrscan_core::errors::{RearrangementError, Result};
use rearrscan_core::models::segment::flags;
use rearrscan_core::repositories::RegionCatalog;
use rearrscan_core::{AlignmentRecord, CompoundRegion, GenomicRegion, GenomicRegions, PlacedSegment, ReadOrder, RegionsName};

/// A catalog with a handful of short regions on a toy genome
pub struct TestCatalog {
    regions: HashMap<RegionsName, CompoundRegion>,
}

impl TestCatalog {
    pub fn new() -> Self {
        let mut catalog = TestCatalog {
            regions: HashMap::default(),
        };
        catalog.insert(
            RegionsName::GRCh38,
            &[("chr1", 1, 1_000_000), ("chr3", 1, 1_000_000), ("chr4", 1, 1_000_000), ("chr14", 1, 1_000_000)],
        );
        catalog.insert(RegionsName::CoreDUX4, &[("chr4", 1001, 2000)]);
        catalog.insert(RegionsName::ExtendedDUX4, &[("chr4", 1, 10_000), ("chr3", 500_001, 510_000)]);
        catalog.insert(RegionsName::IGH, &[("chr14", 5001, 8000)]);
        catalog
    }

    pub fn with_blacklist(mut self, entries: &[(&str, u32, u32)]) -> Self {
        self.insert(RegionsName::BLACKLIST, entries);
        self
    }

    fn insert(&mut self, name: RegionsName, entries: &[(&str, u32, u32)]) {
        self.regions.insert(name, CompoundRegion::new(name, regions(entries)));
    }
}

impl RegionCatalog for TestCatalog {
    fn get(&self, name: RegionsName) -> Result<CompoundRegion> {
        self.regions
            .get(&name)
            .cloned()
            .ok_or(RearrangementError::UnknownRegionName(name))
    }
}

pub fn regions(entries: &[(&str, u32, u32)]) -> GenomicRegions {
    entries
        .iter()
        .map(|(chrom, start, end)| GenomicRegion::new(*chrom, *start, *end))
        .collect()
}

///
/// Builds a paired, mapped segment with mapping quality 60. The position
/// makes it distinct from other segments of the same read.
///
pub struct SegmentBuilder {
    segment: PlacedSegment,
}

impl SegmentBuilder {
    pub fn new(name: &str, order: ReadOrder, location: &GenomicRegions, position: u32) -> Self {
        let first = location.iter().next();
        let order_flag = match order {
            ReadOrder::One => flags::FIRST_SEGMENT,
            ReadOrder::Two => flags::LAST_SEGMENT,
        };
        let content = AlignmentRecord {
            flags: flags::PAIRED | order_flag,
            reference_name: first.map(|region| region.chrom.clone()),
            position: Some(position),
            mapping_quality: Some(60),
            cigar: "100M".to_string(),
            ..Default::default()
        };
        SegmentBuilder {
            segment: PlacedSegment::new(name, location.clone(), order).with_content(content),
        }
    }

    pub fn flags(mut self, bits: u16) -> Self {
        self.segment.content.flags |= bits;
        self
    }

    pub fn mapq(mut self, mapq: u8) -> Self {
        self.segment.content.mapping_quality = Some(mapq);
        self
    }

    pub fn mate(mut self, chrom: &str, position: u32) -> Self {
        self.segment.content.mate_reference_name = Some(chrom.to_string());
        self.segment.content.mate_position = Some(position);
        self
    }

    pub fn build(self) -> PlacedSegment {
        self.segment
    }
}
