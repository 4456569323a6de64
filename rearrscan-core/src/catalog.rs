use crate::errors::{RearrangementError, Result};
use crate::models::{CompoundRegion, GenomicRegion, GenomicRegions, RegionsName};
use crate::repositories::RegionCatalog;

const GRCH38: &[(&str, u32, u32)] = &[
    ("chr1", 1, 248956422),
    ("chr2", 1, 242193529),
    ("chr3", 1, 198295559),
    ("chr4", 1, 190214555),
    ("chr5", 1, 181538259),
    ("chr6", 1, 170805979),
    ("chr7", 1, 159345973),
    ("chr8", 1, 145138636),
    ("chr9", 1, 138394717),
    ("chr10", 1, 133797422),
    ("chr11", 1, 135086622),
    ("chr12", 1, 133275309),
    ("chr13", 1, 114364328),
    ("chr14", 1, 107043718),
    ("chr15", 1, 101991189),
    ("chr16", 1, 90338345),
    ("chr17", 1, 83257441),
    ("chr18", 1, 80373285),
    ("chr19", 1, 58617616),
    ("chr20", 1, 64444167),
    ("chr21", 1, 46709983),
    ("chr22", 1, 50818468),
    ("chrX", 1, 156040895),
    ("chrY", 1, 57227415),
];

const CORE_DUX4: &[(&str, u32, u32)] = &[
    ("chr4", 190020407, 190023665),
    ("chr4", 190066935, 190093279),
    ("chr4", 190172774, 190176845),
    ("chr10", 133663429, 133685936),
    ("chr10", 133739606, 133762125),
];

// DUX4 tandem arrays on 4q35/10q26 and the dispersed DUX4-like loci
const EXTENDED_DUX4: &[(&str, u32, u32)] = &[
    ("chr4", 189967935, 190204560),
    ("chr10", 133564429, 133787422),
    ("chr3", 75667931, 75671185),
    ("chr5", 31248879, 31251987),
    ("chr9", 63816748, 63819462),
    ("chr12", 34207415, 34210675),
    ("chr12", 61599067, 61601843),
    ("chr16", 34134736, 34137792),
    ("chr16", 34140256, 34143849),
    ("chr20", 29317824, 29320579),
    ("chr20", 29323092, 29326049),
    ("chr20", 29409348, 29412600),
    ("chr20", 29447517, 29450306),
    ("chr20", 29877636, 29880363),
    ("chrY", 10170590, 10173725),
    ("chrY", 11305918, 11309181),
    ("chrY", 11313921, 11317187),
    ("chrY", 11320557, 11323823),
    ("chrY", 11331329, 11334595),
];

const IGH: &[(&str, u32, u32)] = &[("chr14", 105586937, 106879844)];

fn to_regions(entries: &[(&str, u32, u32)]) -> GenomicRegions {
    entries
        .iter()
        .map(|(chrom, start, end)| GenomicRegion::new(*chrom, *start, *end))
        .collect()
}

///
/// Region coordinates shipped with the program, all on GRCh38.
///
/// Knows [RegionsName::GRCh38], [RegionsName::CoreDUX4],
/// [RegionsName::ExtendedDUX4] and [RegionsName::IGH].
///
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinRegionCatalog;

impl BuiltinRegionCatalog {
    pub fn new() -> Self {
        BuiltinRegionCatalog
    }
}

impl RegionCatalog for BuiltinRegionCatalog {
    fn get(&self, name: RegionsName) -> Result<CompoundRegion> {
        let entries = match name {
            RegionsName::GRCh38 => GRCH38,
            RegionsName::CoreDUX4 => CORE_DUX4,
            RegionsName::ExtendedDUX4 => EXTENDED_DUX4,
            RegionsName::IGH => IGH,
            RegionsName::UNNAMED | RegionsName::BLACKLIST => {
                return Err(RearrangementError::UnknownRegionName(name));
            }
        };
        Ok(CompoundRegion::new(name, to_regions(entries)))
    }
}
