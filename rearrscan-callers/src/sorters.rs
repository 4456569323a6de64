use rearrscan_core::Rearrangement;

pub trait RearrangementSorter {
    fn sort(&self, rearrangements: Vec<Rearrangement>) -> Vec<Rearrangement>;
}

/// Highest SRPB first. Ties keep their relative order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SrpbSorter;

impl RearrangementSorter for SrpbSorter {
    fn sort(&self, mut rearrangements: Vec<Rearrangement>) -> Vec<Rearrangement> {
        rearrangements.sort_by(|a, b| b.srpb.total_cmp(&a.srpb));
        rearrangements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rearrscan_core::{ClassifiedSegmentCount, CompoundRegion, CompoundRegionPair, GenomicRegions, RegionsName};
    use rstest::*;
    use std::collections::BTreeSet;

    fn rearrangement(name: RegionsName, srpb: f64) -> Rearrangement {
        let a = CompoundRegion::new(RegionsName::CoreDUX4, GenomicRegions::new());
        let b = CompoundRegion::new(name, GenomicRegions::new());
        Rearrangement::new(
            CompoundRegionPair::new(a, b),
            ClassifiedSegmentCount::default(),
            srpb,
            BTreeSet::new(),
        )
    }

    #[rstest]
    fn test_sorts_by_decreasing_srpb() {
        let sorted = SrpbSorter.sort(vec![
            rearrangement(RegionsName::UNNAMED, 4.0),
            rearrangement(RegionsName::UNNAMED, 5.0),
            rearrangement(RegionsName::UNNAMED, 3.0),
        ]);
        let srpbs: Vec<f64> = sorted.iter().map(|r| r.srpb).collect();
        assert_eq!(srpbs, vec![5.0, 4.0, 3.0]);
    }

    #[rstest]
    fn test_ties_keep_order() {
        let sorted = SrpbSorter.sort(vec![
            rearrangement(RegionsName::IGH, 4.0),
            rearrangement(RegionsName::UNNAMED, 4.0),
            rearrangement(RegionsName::ExtendedDUX4, 6.0),
        ]);
        let names: Vec<RegionsName> = sorted.iter().map(|r| r.region_pair.b.name).collect();
        assert_eq!(
            names,
            vec![RegionsName::ExtendedDUX4, RegionsName::IGH, RegionsName::UNNAMED]
        );
    }
}
