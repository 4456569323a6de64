use std::collections::BTreeSet;

use crate::errors::{RearrangementError, Result};
use crate::models::region::GenomicRegions;
use crate::models::segment::{PlacedSegment, ReadOrder};

///
/// A single read of a pair. A `Read` is created empty and [PlacedSegment]s
/// are then allocated to it; all of them must share one name and one order.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Read {
    segments: Vec<PlacedSegment>,
    read_order: Option<ReadOrder>,
    read_name: Option<String>,
}

impl Read {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.read_name.as_deref()
    }

    /// The locations of the segments allocated to this read
    pub fn locations(&self) -> BTreeSet<&GenomicRegions> {
        self.segments.iter().map(|segment| &segment.location).collect()
    }

    /// True if this read has segments located in both `a` and `b`
    pub fn is_split_across(&self, a: &GenomicRegions, b: &GenomicRegions) -> bool {
        if self.segments.len() < 2 {
            return false;
        }
        let locations = self.locations();
        locations.contains(a) && locations.contains(b)
    }

    pub fn allocate(&mut self, segment: PlacedSegment) -> Result<()> {
        if let Some(order) = self.read_order {
            if order != segment.read_order {
                return Err(RearrangementError::InvalidReadOrder {
                    segment: segment.read_order.to_string(),
                    read: self.display_name(),
                });
            }
        }
        if let Some(name) = &self.read_name {
            if *name != segment.read_name {
                return Err(RearrangementError::InvalidReadName {
                    segment: segment.read_name,
                    read: self.display_name(),
                });
            }
        }

        self.read_order = Some(segment.read_order);
        if self.read_name.is_none() {
            self.read_name = Some(segment.read_name.clone());
        }
        if !self.segments.contains(&segment) {
            self.segments.push(segment);
        }
        Ok(())
    }

    pub fn segments(&self) -> impl Iterator<Item = &PlacedSegment> {
        self.segments.iter()
    }

    fn display_name(&self) -> String {
        self.read_name.clone().unwrap_or_else(|| "None".to_string())
    }
}

///
/// A read pair, made of read one and read two. Like [Read], it is created
/// empty and segments are allocated to the right read by their order.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadPair {
    one: Read,
    two: Read,
    read_name: Option<String>,
}

impl ReadPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.read_name.as_deref()
    }

    pub fn reads(&self) -> [&Read; 2] {
        [&self.one, &self.two]
    }

    pub fn allocate(&mut self, segment: PlacedSegment) -> Result<()> {
        if let Some(name) = &self.read_name {
            if *name != segment.read_name {
                return Err(RearrangementError::InvalidReadName {
                    segment: segment.read_name,
                    read: name.clone(),
                });
            }
        }
        let name = segment.read_name.clone();
        match segment.read_order {
            ReadOrder::One => self.one.allocate(segment)?,
            ReadOrder::Two => self.two.allocate(segment)?,
        }
        self.read_name = Some(name);
        Ok(())
    }

    pub fn has_split_read_across(&self, a: &GenomicRegions, b: &GenomicRegions) -> bool {
        self.reads().iter().any(|read| read.is_split_across(a, b))
    }

    ///
    /// True if the two reads jointly cover both `a` and `b` while neither of
    /// them is split across `a` and `b`.
    ///
    pub fn has_improper_pair_across(&self, a: &GenomicRegions, b: &GenomicRegions) -> bool {
        self.has_reads_across(a, b) && !self.has_split_read_across(a, b)
    }

    /// True if both reads have at least one segment
    pub fn has_both_mates(&self) -> bool {
        !self.one.is_empty() && !self.two.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PlacedSegment> {
        self.one.segments().chain(self.two.segments())
    }

    fn has_reads_across(&self, a: &GenomicRegions, b: &GenomicRegions) -> bool {
        let target: BTreeSet<&GenomicRegions> = BTreeSet::from([a, b]);
        let covered: BTreeSet<&GenomicRegions> = self
            .reads()
            .iter()
            .flat_map(|read| read.locations())
            .filter(|location| target.contains(location))
            .collect();
        covered == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlignmentRecord, GenomicRegion};
    use pretty_assertions::assert_eq;
    use rstest::*;

    const R1: ReadOrder = ReadOrder::One;
    const R2: ReadOrder = ReadOrder::Two;

    fn location(name: char) -> GenomicRegions {
        let region = match name {
            'A' => GenomicRegion::new("chr1", 123, 456),
            'B' => GenomicRegion::new("chr10", 345, 456),
            _ => GenomicRegion::new("chr7", 4567, 8901),
        };
        GenomicRegions::from([region])
    }

    fn segment(name: &str, at: char, order: ReadOrder) -> PlacedSegment {
        PlacedSegment::new(name, location(at), order)
    }

    /// Segments are made distinct by their position so that repeated
    /// locations still count as separate alignments.
    fn distinct_segments(data: &[(char, ReadOrder)]) -> Vec<PlacedSegment> {
        data.iter()
            .enumerate()
            .map(|(i, (at, order))| {
                segment("ABCD", *at, *order).with_content(AlignmentRecord {
                    position: Some(i as u32 + 1),
                    ..Default::default()
                })
            })
            .collect()
    }

    #[rstest]
    fn test_is_split() {
        let mut read = Read::new();
        read.allocate(segment("ABCD", 'A', R1)).unwrap();
        assert!(!read.is_split_across(&location('A'), &location('B')));
        read.allocate(segment("ABCD", 'B', R1)).unwrap();
        assert!(read.is_split_across(&location('A'), &location('B')));
        assert!(!read.is_split_across(&location('A'), &location('C')));
    }

    #[rstest]
    fn test_allocate_raises_different_read_order() {
        let mut read = Read::new();
        read.allocate(segment("A00555", 'A', R1)).unwrap();
        let err = read.allocate(segment("A00555", 'A', R2)).unwrap_err();
        assert!(matches!(err, RearrangementError::InvalidReadOrder { .. }));
        assert_eq!(err.to_string(), "Impossible to allocate segment TWO to read A00555");
    }

    #[rstest]
    fn test_allocate_raises_different_read_name() {
        let mut read = Read::new();
        read.allocate(segment("A00555", 'A', R1)).unwrap();
        let err = read.allocate(segment("ABCDE", 'B', R1)).unwrap_err();
        assert_eq!(err.to_string(), "Impossible to allocate segment ABCDE to read A00555");
        assert_eq!(read.len(), 1);
    }

    #[rstest]
    fn test_len_and_locations() {
        let mut read = Read::new();
        assert!(read.is_empty());
        read.allocate(segment("ABCD", 'A', R1)).unwrap();
        read.allocate(segment("ABCD", 'A', R1)).unwrap();
        assert_eq!(read.len(), 1);
        read.allocate(segment("ABCD", 'B', R1)).unwrap();
        assert_eq!(read.len(), 2);
        let a = location('A');
        let b = location('B');
        assert_eq!(read.locations(), BTreeSet::from([&a, &b]));
    }

    #[rstest]
    fn test_has_both_mates() {
        let mut read_pair = ReadPair::new();
        read_pair.allocate(segment("ABCD", 'A', R1)).unwrap();
        assert!(!read_pair.has_both_mates());
        read_pair.allocate(segment("ABCD", 'B', R2)).unwrap();
        assert!(read_pair.has_both_mates());
        assert_eq!(read_pair.segments().count(), 2);
    }

    #[rstest]
    fn test_read_pair_allocate_fails_if_name_different() {
        let mut read_pair = ReadPair::new();
        read_pair.allocate(segment("A00555", 'A', R1)).unwrap();
        let err = read_pair.allocate(segment("ABCDE", 'B', R2)).unwrap_err();
        assert_eq!(err.to_string(), "Impossible to allocate segment ABCDE to read A00555");
    }

    #[rstest]
    #[case::typical_split_read(&[('A', R1), ('B', R1), ('B', R2)], true, false)]
    #[case::split_across_irrelevant_region(&[('A', R1), ('C', R1), ('C', R2)], false, false)]
    #[case::split_across_irrelevant_region_with_pair(&[('A', R1), ('C', R1), ('B', R2)], false, true)]
    #[case::split_across_relevant_and_irrelevant(&[('A', R1), ('B', R1), ('C', R2), ('B', R2)], true, false)]
    #[case::four_segments_one_split_read(&[('A', R1), ('B', R1), ('B', R2), ('B', R2)], true, false)]
    #[case::four_segments_two_split_reads(&[('A', R1), ('B', R1), ('B', R2), ('A', R2)], true, false)]
    #[case::only_one_read(&[('A', R1)], false, false)]
    #[case::two_segments_same_region(&[('A', R1), ('A', R1)], false, false)]
    #[case::typical_improper_pair(&[('A', R1), ('B', R2)], false, true)]
    #[case::typical_proper_pair(&[('A', R1), ('A', R2)], false, false)]
    #[case::improper_pair_with_repeated_location(&[('A', R1), ('A', R1), ('B', R2)], false, true)]
    #[case::paired_read_across_two_regions(&[('A', R1), ('B', R2), ('B', R2)], false, true)]
    fn test_has_split_read_and_improper_pair(
        #[case] data: &[(char, ReadOrder)],
        #[case] is_split: bool,
        #[case] is_paired: bool,
    ) {
        let mut read_pair = ReadPair::new();
        for segment in distinct_segments(data) {
            read_pair.allocate(segment).unwrap();
        }
        let (a, b) = (location('A'), location('B'));
        assert_eq!(read_pair.has_split_read_across(&a, &b), is_split);
        assert_eq!(read_pair.has_improper_pair_across(&a, &b), is_paired);
    }
}
