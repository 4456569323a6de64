use std::collections::BTreeSet;
use std::iter;
use std::rc::Rc;

use rearrscan_core::errors::{RearrangementError, Result};
use rearrscan_core::repositories::SegmentCounter;
use rearrscan_core::{PlacedSegment, Rearrangement, spanning_reads_per_billion};

use crate::read_callers::ReadsCaller;
use crate::region_pair_callers::CompoundRegionPairCaller;
use crate::selectors::RearrangementSelector;
use crate::sorters::RearrangementSorter;

pub type RearrangementIter<'a> = Box<dyn Iterator<Item = Result<Rearrangement>> + 'a>;

pub trait RearrangementCaller {
    fn get_rearrangements(&mut self) -> Result<RearrangementIter<'_>>;
}

///
/// Scores every region pair of a [CompoundRegionPairCaller] with the reads
/// spanning it. Region pairs are processed one at a time, as the returned
/// iterator is consumed.
///
pub struct RegionRearrangementCaller {
    region_pair_caller: Box<dyn CompoundRegionPairCaller>,
    reads_caller: Box<dyn ReadsCaller>,
    counter: Rc<dyn SegmentCounter>,
}

impl RegionRearrangementCaller {
    pub fn new(
        region_pair_caller: Box<dyn CompoundRegionPairCaller>,
        reads_caller: Box<dyn ReadsCaller>,
        counter: Rc<dyn SegmentCounter>,
    ) -> Self {
        RegionRearrangementCaller {
            region_pair_caller,
            reads_caller,
            counter,
        }
    }
}

impl RearrangementCaller for RegionRearrangementCaller {
    fn get_rearrangements(&mut self) -> Result<RearrangementIter<'_>> {
        let RegionRearrangementCaller {
            region_pair_caller,
            reads_caller,
            counter,
        } = self;

        let pairs = region_pair_caller.get_compound_region_pairs()?;
        let rearrangements = pairs.map(move |pair| -> Result<Rearrangement> {
            let pair = pair?;
            reads_caller.detect_reads_spanning_regions(&pair.a.regions, &pair.b.regions)?;
            let counts = reads_caller.get_segment_count();
            let segments = reads_caller
                .get_segments_of_spanning_reads()
                .collect::<Result<BTreeSet<PlacedSegment>>>()?;

            let total = counter.count_segments(None)?;
            if total == 0 {
                return Err(RearrangementError::NoMappedReads);
            }
            let srpb = spanning_reads_per_billion(counts.spanning, total);
            Ok(Rearrangement::new(pair, counts, srpb, segments))
        });
        Ok(Box::new(rearrangements))
    }
}

/// Chains the rearrangements of several callers, in caller order
pub struct MultiRearrangementCaller {
    callers: Vec<Box<dyn RearrangementCaller>>,
}

impl MultiRearrangementCaller {
    pub fn new(callers: Vec<Box<dyn RearrangementCaller>>) -> Self {
        MultiRearrangementCaller { callers }
    }
}

impl RearrangementCaller for MultiRearrangementCaller {
    fn get_rearrangements(&mut self) -> Result<RearrangementIter<'_>> {
        let rearrangements = self
            .callers
            .iter_mut()
            .flat_map(|caller| match caller.get_rearrangements() {
                Ok(rearrangements) => rearrangements,
                Err(err) => Box::new(iter::once(Err(err))) as RearrangementIter<'_>,
            });
        Ok(Box::new(rearrangements))
    }
}

/// Keeps the rearrangements a selector agrees with
pub struct SelectableRearrangementCaller {
    caller: Box<dyn RearrangementCaller>,
    selector: Box<dyn RearrangementSelector>,
}

impl SelectableRearrangementCaller {
    pub fn new(caller: Box<dyn RearrangementCaller>, selector: Box<dyn RearrangementSelector>) -> Self {
        SelectableRearrangementCaller { caller, selector }
    }
}

impl RearrangementCaller for SelectableRearrangementCaller {
    fn get_rearrangements(&mut self) -> Result<RearrangementIter<'_>> {
        let SelectableRearrangementCaller { caller, selector } = self;
        let rearrangements = caller
            .get_rearrangements()?
            .filter(move |rearrangement| match rearrangement {
                Ok(rearrangement) => selector.select(rearrangement),
                Err(_) => true,
            });
        Ok(Box::new(rearrangements))
    }
}

///
/// Sorts the rearrangements of another caller. All of them are computed
/// before the first one is yielded.
///
pub struct SortedRearrangementCaller {
    caller: Box<dyn RearrangementCaller>,
    sorter: Box<dyn RearrangementSorter>,
}

impl SortedRearrangementCaller {
    pub fn new(caller: Box<dyn RearrangementCaller>, sorter: Box<dyn RearrangementSorter>) -> Self {
        SortedRearrangementCaller { caller, sorter }
    }
}

impl RearrangementCaller for SortedRearrangementCaller {
    fn get_rearrangements(&mut self) -> Result<RearrangementIter<'_>> {
        let rearrangements = self
            .caller
            .get_rearrangements()?
            .collect::<Result<Vec<Rearrangement>>>()?;
        let sorted = self.sorter.sort(rearrangements);
        Ok(Box::new(sorted.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_callers::SpanningReadsCaller;
    use crate::region_pair_callers::{NamedRegionPairCaller, RegionPairIter};
    use crate::selectors::SrpbRearrangementSelector;
    use crate::sorters::SrpbSorter;
    use crate::testing::{SegmentBuilder, TestCatalog, regions};
    use pretty_assertions::assert_eq;
    use rearrscan_core::memory::InMemorySegmentRepository;
    use rearrscan_core::repositories::{ProvidedSegmentCounter, RegionCatalog};
    use rearrscan_core::ReadOrder::{One, Two};
    use rearrscan_core::{ClassifiedSegmentCount, CompoundRegion, CompoundRegionPair, GenomicRegions, RegionsName};
    use rstest::*;

    /// Replays rearrangements with fixed SRPB values
    struct FixedCaller {
        rearrangements: Vec<Rearrangement>,
    }

    impl FixedCaller {
        fn boxed(name: RegionsName, srpbs: &[f64]) -> Box<dyn RearrangementCaller> {
            let rearrangements = srpbs
                .iter()
                .map(|srpb| {
                    let a = CompoundRegion::new(RegionsName::CoreDUX4, GenomicRegions::new());
                    let b = CompoundRegion::new(name, GenomicRegions::new());
                    Rearrangement::new(
                        CompoundRegionPair::new(a, b),
                        ClassifiedSegmentCount::default(),
                        *srpb,
                        BTreeSet::new(),
                    )
                })
                .collect();
            Box::new(FixedCaller { rearrangements })
        }
    }

    impl RearrangementCaller for FixedCaller {
        fn get_rearrangements(&mut self) -> Result<RearrangementIter<'_>> {
            Ok(Box::new(self.rearrangements.clone().into_iter().map(Ok)))
        }
    }

    struct FailingPairCaller;

    impl CompoundRegionPairCaller for FailingPairCaller {
        fn get_compound_region_pairs(&mut self) -> Result<RegionPairIter<'_>> {
            Err(RearrangementError::UnknownRegionName(RegionsName::BLACKLIST))
        }
    }

    fn collect(caller: &mut dyn RearrangementCaller) -> Vec<(RegionsName, f64)> {
        caller
            .get_rearrangements()
            .unwrap()
            .map(|rearrangement| {
                let rearrangement = rearrangement.unwrap();
                (rearrangement.region_pair.b.name, rearrangement.srpb)
            })
            .collect()
    }

    fn region_caller(total: u64) -> RegionRearrangementCaller {
        let catalog: Rc<dyn RegionCatalog> = Rc::new(TestCatalog::new());
        let core = regions(&[("chr4", 1001, 2000)]);
        let extended = regions(&[("chr4", 1, 10_000)]);
        let igh = regions(&[("chr14", 5001, 8000)]);
        let repository = Rc::new(InMemorySegmentRepository::new(vec![
            SegmentBuilder::new("foo", One, &core, 1100).build(),
            SegmentBuilder::new("foo", Two, &igh, 6000).build(),
            SegmentBuilder::new("bar", One, &core, 1200).build(),
            SegmentBuilder::new("bar", One, &igh, 6100).build(),
            SegmentBuilder::new("baz", One, &extended, 9000).build(),
            SegmentBuilder::new("baz", Two, &igh, 7000).build(),
        ]));
        RegionRearrangementCaller::new(
            Box::new(NamedRegionPairCaller::with_default_pairs(catalog)),
            Box::new(SpanningReadsCaller::new(repository, 0)),
            Rc::new(ProvidedSegmentCounter::new(total)),
        )
    }

    #[rstest]
    fn test_region_caller() {
        let mut caller = region_caller(2_000_000_000);
        let rearrangements: Vec<Rearrangement> = caller
            .get_rearrangements()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rearrangements.len(), 2);
        let core = &rearrangements[0];
        assert_eq!(core.region_pair.names(), (RegionsName::CoreDUX4, RegionsName::IGH));
        assert_eq!(core.counts, ClassifiedSegmentCount::new(1, 1, 2));
        assert_eq!(core.srpb, 1.0);
        assert_eq!(core.segments.len(), 4);

        let extended = &rearrangements[1];
        assert_eq!(extended.region_pair.names(), (RegionsName::ExtendedDUX4, RegionsName::IGH));
        assert_eq!(extended.counts, ClassifiedSegmentCount::new(1, 0, 1));
        assert_eq!(extended.srpb, 0.5);
    }

    #[rstest]
    fn test_region_caller_fails_without_reads() {
        let mut caller = region_caller(0);
        let first = caller.get_rearrangements().unwrap().next().unwrap();
        assert!(matches!(first, Err(RearrangementError::NoMappedReads)));
    }

    #[rstest]
    fn test_region_caller_propagates_pair_errors() {
        let mut caller = RegionRearrangementCaller::new(
            Box::new(FailingPairCaller),
            Box::new(SpanningReadsCaller::new(Rc::new(InMemorySegmentRepository::default()), 0)),
            Rc::new(ProvidedSegmentCounter::new(10)),
        );
        assert!(caller.get_rearrangements().is_err());
    }

    #[rstest]
    fn test_multi_caller_keeps_caller_order() {
        let mut caller = MultiRearrangementCaller::new(vec![
            FixedCaller::boxed(RegionsName::IGH, &[1.0, 2.0]),
            FixedCaller::boxed(RegionsName::UNNAMED, &[5.0, 3.0]),
        ]);
        assert_eq!(
            collect(&mut caller),
            vec![
                (RegionsName::IGH, 1.0),
                (RegionsName::IGH, 2.0),
                (RegionsName::UNNAMED, 5.0),
                (RegionsName::UNNAMED, 3.0)
            ]
        );
    }

    #[rstest]
    fn test_multi_caller_reports_failing_caller() {
        let failing = RegionRearrangementCaller::new(
            Box::new(FailingPairCaller),
            Box::new(SpanningReadsCaller::new(Rc::new(InMemorySegmentRepository::default()), 0)),
            Rc::new(ProvidedSegmentCounter::new(10)),
        );
        let mut caller = MultiRearrangementCaller::new(vec![
            FixedCaller::boxed(RegionsName::IGH, &[1.0]),
            Box::new(failing),
        ]);
        let results: Vec<Result<Rearrangement>> = caller.get_rearrangements().unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[rstest]
    fn test_selectable_caller() {
        let mut caller = SelectableRearrangementCaller::new(
            FixedCaller::boxed(RegionsName::UNNAMED, &[3.0, 2.999, 4.0]),
            Box::new(SrpbRearrangementSelector::new(3.0)),
        );
        assert_eq!(
            collect(&mut caller),
            vec![(RegionsName::UNNAMED, 3.0), (RegionsName::UNNAMED, 4.0)]
        );
    }

    #[rstest]
    fn test_sorted_caller() {
        let mut caller = SortedRearrangementCaller::new(
            FixedCaller::boxed(RegionsName::UNNAMED, &[4.0, 5.0, 3.0]),
            Box::new(SrpbSorter),
        );
        let srpbs: Vec<f64> = collect(&mut caller).into_iter().map(|(_, srpb)| srpb).collect();
        assert_eq!(srpbs, vec![5.0, 4.0, 3.0]);
    }

    #[rstest]
    fn test_named_first_then_sorted_discoveries() {
        let mut caller = MultiRearrangementCaller::new(vec![
            FixedCaller::boxed(RegionsName::IGH, &[0.5, 0.0]),
            Box::new(SortedRearrangementCaller::new(
                Box::new(SelectableRearrangementCaller::new(
                    FixedCaller::boxed(RegionsName::UNNAMED, &[20.0, 19.9, 45.0, 30.0]),
                    Box::new(SrpbRearrangementSelector::new(20.0)),
                )),
                Box::new(SrpbSorter),
            )),
        ]);
        assert_eq!(
            collect(&mut caller),
            vec![
                (RegionsName::IGH, 0.5),
                (RegionsName::IGH, 0.0),
                (RegionsName::UNNAMED, 45.0),
                (RegionsName::UNNAMED, 30.0),
                (RegionsName::UNNAMED, 20.0)
            ]
        );
    }
}
