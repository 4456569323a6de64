//!
//! Scratch stores used during one classification or consolidation pass.
//! Owners call `clear` at the start of every pass.
//!
use std::collections::{BTreeMap, BTreeSet};

use fxhash::FxHashMap as HashMap;

use crate::errors::{RearrangementError, Result};
use crate::models::{GenomicRegion, PlacedSegment, ReadPair};

///
/// Read pairs by name, plus the names marked as improperly paired, split or
/// spanning during the current pass.
///
#[derive(Debug, Default)]
pub struct PairedReadStore {
    reads: HashMap<String, ReadPair>,
    paired: BTreeSet<String>,
    split: BTreeSet<String>,
    spanning: BTreeSet<String>,
}

impl PairedReadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.reads.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn get_read_pair(&self, name: &str) -> Result<&ReadPair> {
        self.reads
            .get(name)
            .ok_or_else(|| RearrangementError::UnknownReadPair(name.to_string()))
    }

    pub fn get_read_pair_mut(&mut self, name: &str) -> Result<&mut ReadPair> {
        self.reads
            .get_mut(name)
            .ok_or_else(|| RearrangementError::UnknownReadPair(name.to_string()))
    }

    /// Store `read_pair` under its own name, replacing any previous pair
    pub fn update(&mut self, read_pair: ReadPair) -> Result<()> {
        let name = read_pair.name().ok_or(RearrangementError::UnnamedReadPair)?.to_string();
        self.reads.insert(name, read_pair);
        Ok(())
    }

    ///
    /// Allocate `segment` to the pair of the same name, creating the pair
    /// when `create` is set. Returns false if the pair is unknown and was
    /// not created.
    ///
    pub fn allocate(&mut self, segment: PlacedSegment, create: bool) -> Result<bool> {
        if let Some(read_pair) = self.reads.get_mut(&segment.read_name) {
            read_pair.allocate(segment)?;
            return Ok(true);
        }
        if !create {
            return Ok(false);
        }
        let mut read_pair = ReadPair::new();
        read_pair.allocate(segment)?;
        self.update(read_pair)?;
        Ok(true)
    }

    pub fn read_pairs(&self) -> impl Iterator<Item = &ReadPair> {
        self.reads.values()
    }

    pub fn mark_as_paired(&mut self, name: &str) -> Result<()> {
        let name = self.known_name(name)?;
        self.paired.insert(name);
        Ok(())
    }

    pub fn mark_as_split(&mut self, name: &str) -> Result<()> {
        let name = self.known_name(name)?;
        self.split.insert(name);
        Ok(())
    }

    pub fn mark_as_spanning(&mut self, name: &str) -> Result<()> {
        let name = self.known_name(name)?;
        self.spanning.insert(name);
        Ok(())
    }

    /// (paired, split, spanning) counts of distinct read pairs
    pub fn segment_count(&self) -> (usize, usize, usize) {
        (self.paired.len(), self.split.len(), self.spanning.len())
    }

    /// Spanning read pairs, in name order
    pub fn spanning_reads(&self) -> impl Iterator<Item = &ReadPair> {
        self.spanning.iter().filter_map(|name| self.reads.get(name))
    }

    pub fn clear(&mut self) {
        self.reads.clear();
        self.paired.clear();
        self.split.clear();
        self.spanning.clear();
    }

    fn known_name(&self, name: &str) -> Result<String> {
        if self.reads.contains_key(name) {
            Ok(name.to_string())
        } else {
            Err(RearrangementError::UnknownReadPair(name.to_string()))
        }
    }
}

/// Region counts for a single chromosome
#[derive(Debug, Clone)]
pub struct SingleChromosomeRegionStore {
    chrom: String,
    regions: HashMap<GenomicRegion, u32>,
}

impl SingleChromosomeRegionStore {
    pub fn new(chrom: impl Into<String>) -> Self {
        SingleChromosomeRegionStore {
            chrom: chrom.into(),
            regions: HashMap::default(),
        }
    }

    pub fn add(&mut self, region: GenomicRegion) -> Result<()> {
        if region.chrom != self.chrom {
            return Err(RearrangementError::WrongChromosome {
                expected: self.chrom.clone(),
                found: region.chrom,
            });
        }
        *self.regions.entry(region).or_insert(0) += 1;
        Ok(())
    }

    pub fn delete(&mut self, region: &GenomicRegion) {
        self.regions.remove(region);
    }

    /// Regions sorted by start position, with their counts
    pub fn counted_regions(&self) -> Vec<(GenomicRegion, u32)> {
        let mut counted: Vec<(GenomicRegion, u32)> =
            self.regions.iter().map(|(region, count)| (region.clone(), *count)).collect();
        counted.sort_by(|(a, _), (b, _)| (a.start, a.end).cmp(&(b.start, b.end)));
        counted
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

///
/// Counts how many times each region was observed, one
/// [SingleChromosomeRegionStore] per chromosome.
///
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    chromosomes: BTreeMap<String, SingleChromosomeRegionStore>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, region: GenomicRegion) -> Result<()> {
        self.chromosomes
            .entry(region.chrom.clone())
            .or_insert_with(|| SingleChromosomeRegionStore::new(region.chrom.clone()))
            .add(region)
    }

    pub fn delete(&mut self, region: &GenomicRegion) {
        if let Some(store) = self.chromosomes.get_mut(&region.chrom) {
            store.delete(region);
            if store.is_empty() {
                self.chromosomes.remove(&region.chrom);
            }
        }
    }

    /// All regions sorted by chromosome name, then start
    pub fn counted_regions(&self) -> Vec<(GenomicRegion, u32)> {
        self.chromosomes
            .values()
            .flat_map(|store| store.counted_regions())
            .collect()
    }

    pub fn regions(&self) -> Vec<GenomicRegion> {
        self.counted_regions().into_iter().map(|(region, _)| region).collect()
    }

    pub fn clear(&mut self) {
        self.chromosomes.clear();
    }
}
