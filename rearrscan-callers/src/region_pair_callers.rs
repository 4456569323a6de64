use std::rc::Rc;

use rearrscan_core::errors::Result;
use rearrscan_core::repositories::RegionCatalog;
use rearrscan_core::{CompoundRegion, CompoundRegionPair, GenomicRegions, RegionsName};

use crate::region_callers::CandidateRegionCaller;

pub type RegionPairIter<'a> = Box<dyn Iterator<Item = Result<CompoundRegionPair>> + 'a>;

/// Region pairs tested by default, in report order
pub const DEFAULT_NAMED_PAIRS: [(RegionsName, RegionsName); 2] = [
    (RegionsName::CoreDUX4, RegionsName::IGH),
    (RegionsName::ExtendedDUX4, RegionsName::IGH),
];

pub trait CompoundRegionPairCaller {
    fn get_compound_region_pairs(&mut self) -> Result<RegionPairIter<'_>>;
}

/// Yields fixed pairs of named regions, looked up in a catalog
pub struct NamedRegionPairCaller {
    catalog: Rc<dyn RegionCatalog>,
    pairs: Vec<(RegionsName, RegionsName)>,
}

impl NamedRegionPairCaller {
    pub fn new(catalog: Rc<dyn RegionCatalog>, pairs: Vec<(RegionsName, RegionsName)>) -> Self {
        NamedRegionPairCaller { catalog, pairs }
    }

    pub fn with_default_pairs(catalog: Rc<dyn RegionCatalog>) -> Self {
        Self::new(catalog, DEFAULT_NAMED_PAIRS.to_vec())
    }
}

impl CompoundRegionPairCaller for NamedRegionPairCaller {
    fn get_compound_region_pairs(&mut self) -> Result<RegionPairIter<'_>> {
        let catalog = &self.catalog;
        let pairs = self
            .pairs
            .iter()
            .map(move |(a, b)| -> Result<CompoundRegionPair> {
                Ok(CompoundRegionPair::new(catalog.get(*a)?, catalog.get(*b)?))
            });
        Ok(Box::new(pairs))
    }
}

///
/// Pairs a bait region with every candidate region found around it. The
/// candidates are UNNAMED compound regions of a single region each.
///
pub struct BaitRegionPairCaller {
    catalog: Rc<dyn RegionCatalog>,
    bait: RegionsName,
    candidate_caller: CandidateRegionCaller,
}

impl BaitRegionPairCaller {
    pub fn new(catalog: Rc<dyn RegionCatalog>, bait: RegionsName, candidate_caller: CandidateRegionCaller) -> Self {
        BaitRegionPairCaller {
            catalog,
            bait,
            candidate_caller,
        }
    }
}

impl CompoundRegionPairCaller for BaitRegionPairCaller {
    fn get_compound_region_pairs(&mut self) -> Result<RegionPairIter<'_>> {
        let bait = self.catalog.get(self.bait)?;
        let candidates = self.candidate_caller.get_candidates_regions(&bait)?;
        let pairs = candidates.into_iter().map(move |candidate| -> Result<CompoundRegionPair> {
            let candidate = CompoundRegion::new(RegionsName::UNNAMED, GenomicRegions::from([candidate]));
            Ok(CompoundRegionPair::new(bait.clone(), candidate))
        });
        Ok(Box::new(pairs))
    }
}
