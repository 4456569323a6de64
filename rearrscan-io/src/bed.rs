use std::io::BufRead;
use std::path::Path;

use rearrscan_core::errors::RearrangementError;
use rearrscan_core::repositories::RegionCatalog;
use rearrscan_core::{CompoundRegion, GenomicRegion, GenomicRegions, RegionsName};

use crate::error::{RearrscanIoError, Result};
use crate::utils::get_dynamic_reader;

fn is_header(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

///
/// Parse a BED line into a region. Only the first three columns are used.
///
fn parse_bed_line(number: usize, line: &str) -> Result<GenomicRegion> {
    let invalid = || RearrscanIoError::InvalidBedLine {
        line: number,
        content: line.to_string(),
    };
    let mut columns = line.split_whitespace();
    let chrom = columns.next().ok_or_else(invalid)?;
    let start = columns
        .next()
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let end = columns
        .next()
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    Ok(GenomicRegion::new(chrom, start, end))
}

///
/// A region catalog carrying a blacklist read from a BED file, plain or
/// gzip'd. Every other name is looked up in the wrapped catalog.
///
/// The file is read and validated once, when the catalog is created: each
/// entry must end after it starts and lie within the reference genome.
///
pub struct BlacklistRegionCatalog {
    blacklist: CompoundRegion,
    catalog: Box<dyn RegionCatalog>,
}

impl BlacklistRegionCatalog {
    pub fn from_path(path: &Path, catalog: Box<dyn RegionCatalog>) -> Result<Self> {
        let reference = catalog.get(RegionsName::GRCh38)?;
        let reader = get_dynamic_reader(path)?;

        let mut regions = GenomicRegions::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || is_header(&line) {
                continue;
            }
            let region = parse_bed_line(index + 1, &line)?;
            if region.end <= region.start || !reference.contains(&region) {
                return Err(RearrangementError::InvalidRegion {
                    chrom: region.chrom,
                    start: region.start,
                    end: region.end,
                }
                .into());
            }
            regions.insert(region);
        }
        log::debug!("{} blacklisted regions read from {}", regions.len(), path.display());

        Ok(BlacklistRegionCatalog {
            blacklist: CompoundRegion::new(RegionsName::BLACKLIST, regions),
            catalog,
        })
    }
}

impl RegionCatalog for BlacklistRegionCatalog {
    fn get(&self, name: RegionsName) -> rearrscan_core::Result<CompoundRegion> {
        match name {
            RegionsName::BLACKLIST => Ok(self.blacklist.clone()),
            _ => self.catalog.get(name),
        }
    }
}
