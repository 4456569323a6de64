pub mod compound_region;
pub mod read;
pub mod rearrangement;
pub mod region;
pub mod segment;

// re-export for cleaner imports
pub use self::compound_region::{CompoundRegion, CompoundRegionPair, RegionsName};
pub use self::read::{Read, ReadPair};
pub use self::rearrangement::{ClassifiedSegmentCount, Rearrangement, spanning_reads_per_billion};
pub use self::region::{GenomicRegion, GenomicRegions};
pub use self::segment::{AlignmentRecord, PlacedSegment, ReadOrder};
