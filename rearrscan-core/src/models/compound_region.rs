use std::fmt::{self, Display};

use crate::models::region::{GenomicRegion, GenomicRegions};

/// Possible names for a [CompoundRegion]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(clippy::upper_case_acronyms)]
pub enum RegionsName {
    CoreDUX4,
    ExtendedDUX4,
    GRCh38,
    IGH,
    UNNAMED,
    BLACKLIST,
}

impl RegionsName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionsName::CoreDUX4 => "CoreDUX4",
            RegionsName::ExtendedDUX4 => "ExtendedDUX4",
            RegionsName::GRCh38 => "GRCh38",
            RegionsName::IGH => "IGH",
            RegionsName::UNNAMED => "UNNAMED",
            RegionsName::BLACKLIST => "BLACKLIST",
        }
    }
}

impl Display for RegionsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// A named set of [GenomicRegion]s. Overlap and containment only look at
/// the member regions, the name is irrelevant.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundRegion {
    pub name: RegionsName,
    pub regions: GenomicRegions,
}

impl CompoundRegion {
    pub fn new(name: RegionsName, regions: GenomicRegions) -> Self {
        CompoundRegion { name, regions }
    }

    /// True if at least one region of `self` overlaps one region of `other`
    pub fn overlaps(&self, other: &CompoundRegion) -> bool {
        other
            .regions
            .iter()
            .any(|theirs| self.regions.iter().any(|ours| ours.overlaps(theirs)))
    }

    /// True if `region` lies within one of the regions of `self`
    pub fn contains(&self, region: &GenomicRegion) -> bool {
        self.regions.iter().any(|ours| region.within(ours))
    }
}

/// An ordered pair of [CompoundRegion]s
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundRegionPair {
    pub a: CompoundRegion,
    pub b: CompoundRegion,
}

impl CompoundRegionPair {
    pub fn new(a: CompoundRegion, b: CompoundRegion) -> Self {
        CompoundRegionPair { a, b }
    }

    pub fn names(&self) -> (RegionsName, RegionsName) {
        (self.a.name, self.b.name)
    }
}
