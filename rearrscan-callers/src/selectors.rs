use std::cell::OnceCell;
use std::rc::Rc;

use rearrscan_core::errors::{RearrangementError, Result};
use rearrscan_core::repositories::RegionCatalog;
use rearrscan_core::{CompoundRegion, GenomicRegion, Rearrangement, RegionsName};

/// A predicate over candidate regions
pub trait RegionSelector {
    fn select(&self, region: &GenomicRegion) -> Result<bool>;
}

/// A predicate over rearrangements
pub trait RearrangementSelector {
    fn select(&self, rearrangement: &Rearrangement) -> bool;
}

///
/// Selects regions overlapping at least one region of a named
/// [CompoundRegion]. The compound region is fetched from the catalog on
/// first use and kept afterwards.
///
pub struct NamedRegionSelector {
    catalog: Rc<dyn RegionCatalog>,
    name: RegionsName,
    compound_region: OnceCell<CompoundRegion>,
}

impl NamedRegionSelector {
    pub fn new(catalog: Rc<dyn RegionCatalog>, name: RegionsName) -> Self {
        NamedRegionSelector {
            catalog,
            name,
            compound_region: OnceCell::new(),
        }
    }

    fn compound_region(&self) -> Result<&CompoundRegion> {
        if self.compound_region.get().is_none() {
            let fetched = self.catalog.get(self.name)?;
            let _ = self.compound_region.set(fetched);
        }
        self.compound_region
            .get()
            .ok_or(RearrangementError::UnknownRegionName(self.name))
    }
}

impl RegionSelector for NamedRegionSelector {
    fn select(&self, region: &GenomicRegion) -> Result<bool> {
        let compound_region = self.compound_region()?;
        Ok(compound_region.regions.iter().any(|ours| ours.overlaps(region)))
    }
}

/// Inverts another selector
pub struct RegionDeSelector {
    selector: Box<dyn RegionSelector>,
}

impl RegionDeSelector {
    pub fn new(selector: Box<dyn RegionSelector>) -> Self {
        RegionDeSelector { selector }
    }
}

impl RegionSelector for RegionDeSelector {
    fn select(&self, region: &GenomicRegion) -> Result<bool> {
        Ok(!self.selector.select(region)?)
    }
}

/// Keeps rearrangements with an SRPB at or above the threshold
#[derive(Debug, Clone, Copy)]
pub struct SrpbRearrangementSelector {
    threshold: f64,
}

impl SrpbRearrangementSelector {
    pub fn new(threshold: f64) -> Self {
        SrpbRearrangementSelector { threshold }
    }
}

impl RearrangementSelector for SrpbRearrangementSelector {
    fn select(&self, rearrangement: &Rearrangement) -> bool {
        rearrangement.srpb >= self.threshold
    }
}

pub struct SelectorFactory {
    catalog: Rc<dyn RegionCatalog>,
}

impl SelectorFactory {
    pub fn new(catalog: Rc<dyn RegionCatalog>) -> Self {
        SelectorFactory { catalog }
    }

    ///
    /// Selectors for candidate partner regions: on the reference genome,
    /// away from the DUX4 loci and from IGH, and away from the blacklist
    /// when `with_blacklist` is set.
    ///
    pub fn candidate_region_selectors(&self, with_blacklist: bool) -> Vec<Box<dyn RegionSelector>> {
        let mut selectors: Vec<Box<dyn RegionSelector>> = vec![
            Box::new(self.named(RegionsName::GRCh38)),
            Box::new(RegionDeSelector::new(Box::new(self.named(RegionsName::ExtendedDUX4)))),
            Box::new(RegionDeSelector::new(Box::new(self.named(RegionsName::IGH)))),
        ];
        if with_blacklist {
            selectors.push(Box::new(RegionDeSelector::new(Box::new(
                self.named(RegionsName::BLACKLIST),
            ))));
        }
        selectors
    }

    fn named(&self, name: RegionsName) -> NamedRegionSelector {
        NamedRegionSelector::new(self.catalog.clone(), name)
    }
}
