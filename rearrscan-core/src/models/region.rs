use std::collections::BTreeSet;
use std::fmt::{self, Display};

///
/// GenomicRegion struct, a 1-based region with both ends included:
/// `("chr1", 100, 200)` covers bases 100 to 200 of contig `chr1`.
///
/// Ordering is by chromosome name, then start, then end.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct GenomicRegion {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
}

/// A set of regions. Segments are located by the set they were fetched under.
pub type GenomicRegions = BTreeSet<GenomicRegion>;

impl GenomicRegion {
    pub fn new(chrom: impl Into<String>, start: u32, end: u32) -> Self {
        GenomicRegion {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    ///
    /// True if both regions share at least one base. Contiguous regions
    /// (`end + 1 == other.start`) do not overlap.
    ///
    pub fn overlaps(&self, other: &GenomicRegion) -> bool {
        if self.chrom != other.chrom {
            return false;
        }
        let (first, second) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        first.end >= second.start
    }

    /// True if `self` lies fully inside `other`.
    pub fn within(&self, other: &GenomicRegion) -> bool {
        self.chrom == other.chrom && self.start >= other.start && self.end <= other.end
    }

    ///
    /// Get file string of the region
    ///
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}", self.chrom, self.start, self.end)
    }
}

impl Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}
