//!
//! Segments read from an indexed BAM file. The index (`.bai`) must sit next
//! to the BAM file.
//!
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use noodles::bam;
use noodles::bgzf;
use noodles::bgzf::VirtualPosition;
use noodles::core::Region;
use noodles::sam;
use noodles::sam::alignment::io::Write;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record_buf::{Cigar, RecordBuf};

use rearrscan_core::errors::{RearrangementError, Result};
use rearrscan_core::models::segment::flags;
use rearrscan_core::repositories::{
    DEFAULT_COUNT_EXCLUSIONS, ReadQuery, SegmentCounter, SegmentIter, SegmentRepository,
    passes_exclusions,
};
use rearrscan_core::{AlignmentRecord, GenomicRegion, GenomicRegions, PlacedSegment, ReadOrder};

/// MAPQ 255, "mapping quality unavailable"
pub const MAPPING_QUALITY_UNAVAILABLE: u8 = 255;

type BamReader = bam::io::IndexedReader<bgzf::Reader<File>>;

fn kind_to_char(kind: Kind) -> char {
    match kind {
        Kind::Match => 'M',
        Kind::Insertion => 'I',
        Kind::Deletion => 'D',
        Kind::Skip => 'N',
        Kind::SoftClip => 'S',
        Kind::HardClip => 'H',
        Kind::Pad => 'P',
        Kind::SequenceMatch => '=',
        Kind::SequenceMismatch => 'X',
    }
}

/// CIGAR in its SAM text form, `*` when empty
pub fn cigar_to_string(cigar: &Cigar) -> String {
    if cigar.as_ref().is_empty() {
        return "*".to_string();
    }
    cigar
        .as_ref()
        .iter()
        .map(|op| format!("{}{}", op.len(), kind_to_char(op.kind())))
        .collect()
}

/// Number of reference bases covered by `cigar`
fn reference_span(cigar: &Cigar) -> usize {
    cigar
        .as_ref()
        .iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match | Kind::Deletion | Kind::Skip | Kind::SequenceMatch | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len())
        .sum()
}

fn reference_name(header: &sam::Header, id: Option<usize>) -> Option<String> {
    id.and_then(|id| header.reference_sequences().get_index(id))
        .map(|(name, _)| name.to_string())
}

///
/// The optional fields of `record` in SAM text form. noodles serializes the
/// record, everything past the eleven mandatory columns is kept.
///
pub fn optional_fields(header: &sam::Header, record: &RecordBuf) -> Result<Vec<String>> {
    let mut writer = sam::io::Writer::new(Vec::new());
    writer.write_alignment_record(header, record)?;
    let line = String::from_utf8_lossy(writer.get_ref());
    Ok(line
        .trim_end_matches(['\n', '\r'])
        .split('\t')
        .skip(11)
        .map(String::from)
        .collect())
}

///
/// Convert a noodles record into the payload carried by [PlacedSegment]s.
/// Quality scores are stored as phred+33 text. A mapping quality noodles
/// reports as missing was stored as 255 in the file and is kept that way.
///
pub fn to_alignment_record(header: &sam::Header, record: &RecordBuf) -> Result<AlignmentRecord> {
    Ok(AlignmentRecord {
        flags: record.flags().bits(),
        reference_name: reference_name(header, record.reference_sequence_id()),
        position: record.alignment_start().map(|position| position.get() as u32),
        mapping_quality: Some(
            record
                .mapping_quality()
                .map_or(MAPPING_QUALITY_UNAVAILABLE, |mapq| mapq.get()),
        ),
        cigar: cigar_to_string(record.cigar()),
        mate_reference_name: reference_name(header, record.mate_reference_sequence_id()),
        mate_position: record.mate_alignment_start().map(|position| position.get() as u32),
        template_length: record.template_length(),
        sequence: String::from_utf8_lossy(record.sequence().as_ref()).into_owned(),
        quality_scores: record
            .quality_scores()
            .as_ref()
            .iter()
            .map(|score| char::from(score.saturating_add(33)))
            .collect(),
        tags: optional_fields(header, record)?,
    })
}

fn read_order(content: &AlignmentRecord) -> ReadOrder {
    if content.is_first_segment() {
        ReadOrder::One
    } else {
        ReadOrder::Two
    }
}

fn to_region(region: &GenomicRegion) -> Result<Region> {
    format!("{}:{}-{}", region.chrom, region.start, region.end)
        .parse()
        .map_err(|err| RearrangementError::SegmentSource(format!("invalid region {region}: {err}")))
}

fn to_segment(header: &sam::Header, record: &RecordBuf, location: &GenomicRegions) -> Result<PlacedSegment> {
    let name = record
        .name()
        .map(|name| name.to_string())
        .ok_or_else(|| RearrangementError::SegmentSource("record without a name".to_string()))?;
    let content = to_alignment_record(header, record)?;
    Ok(PlacedSegment::new(name, location.clone(), read_order(&content)).with_content(content))
}

/// Whether `segment` survives the exclusions and the mapping quality floor
fn is_selected(segment: &PlacedSegment, exclude: &[ReadQuery], min_quality: u8) -> bool {
    passes_exclusions(&segment.content, exclude) && segment.content.mapping_quality_or_zero() >= min_quality
}

fn count_records<I>(records: I, exclude: &[ReadQuery]) -> Result<u64>
where
    I: Iterator<Item = io::Result<bam::Record>>,
{
    let mut count = 0;
    for record in records {
        let bits = record?.flags().bits();
        if !exclude.iter().any(|query| query.selects_flags(bits)) {
            count += 1;
        }
    }
    Ok(count)
}

///
/// Counts the records of a BAM file, no index needed. With more than one
/// worker, BGZF blocks are decompressed in parallel.
///
pub struct BamSegmentCounter {
    path: PathBuf,
    worker_count: NonZeroUsize,
}

impl BamSegmentCounter {
    pub fn new(path: &Path) -> Self {
        BamSegmentCounter {
            path: path.to_path_buf(),
            worker_count: NonZeroUsize::MIN,
        }
    }

    pub fn with_worker_count(mut self, worker_count: NonZeroUsize) -> Self {
        self.worker_count = worker_count;
        self
    }
}

impl SegmentCounter for BamSegmentCounter {
    fn count_segments(&self, exclude: Option<&[ReadQuery]>) -> Result<u64> {
        let exclude = exclude.unwrap_or(&DEFAULT_COUNT_EXCLUSIONS);

        let count = if self.worker_count.get() > 1 {
            let inner = bgzf::MultithreadedReader::with_worker_count(self.worker_count, File::open(&self.path)?);
            let mut reader = bam::io::Reader::from(inner);
            reader.read_header()?;
            count_records(reader.records(), exclude)?
        } else {
            let mut reader = bam::io::reader::Builder::default().build_from_path(&self.path)?;
            reader.read_header()?;
            count_records(reader.records(), exclude)?
        };

        log::debug!(
            "{} records counted in {} with {} worker(s)",
            count,
            self.path.display(),
            self.worker_count
        );
        Ok(count)
    }
}

///
/// The records of one region, streamed from the shared reader chunk by
/// chunk. The reader is only borrowed while a record is read, so several
/// of these (and mate lookups) can be interleaved; each one seeks back to
/// where it stopped when another has moved the reader.
///
struct RegionRecords<'a> {
    reader: &'a RefCell<BamReader>,
    header: &'a sam::Header,
    reference_id: usize,
    start: usize,
    end: usize,
    chunks: VecDeque<(VirtualPosition, VirtualPosition)>,
    position: Option<VirtualPosition>,
    record: bam::Record,
}

/// Whether the alignment of `record` touches `start..=end` of reference `reference_id`
fn overlaps(record: &RecordBuf, reference_id: usize, start: usize, end: usize) -> bool {
    let Some(alignment_start) = record.alignment_start().map(|position| position.get()) else {
        return false;
    };
    let alignment_end = alignment_start + reference_span(record.cigar()).saturating_sub(1);
    record.reference_sequence_id() == Some(reference_id) && alignment_start <= end && alignment_end >= start
}

impl RegionRecords<'_> {

    fn read_next(&mut self) -> Result<Option<RecordBuf>> {
        let shared = self.reader;
        let mut reader = shared.borrow_mut();
        while let Some(&(chunk_start, chunk_end)) = self.chunks.front() {
            let position = self.position.unwrap_or(chunk_start);
            if position >= chunk_end {
                self.chunks.pop_front();
                self.position = None;
                continue;
            }

            if reader.get_ref().virtual_position() != position {
                reader.get_mut().seek(position)?;
            }
            if reader.read_record(&mut self.record)? == 0 {
                self.chunks.clear();
                break;
            }
            self.position = Some(reader.get_ref().virtual_position());

            let record = RecordBuf::try_from_alignment_record(self.header, &self.record)?;
            if overlaps(&record, self.reference_id, self.start, self.end) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

impl Iterator for RegionRecords<'_> {
    type Item = Result<RecordBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.read_next();
        if next.is_err() {
            self.chunks.clear();
        }
        next.transpose()
    }
}

///
/// A [SegmentRepository] over an indexed BAM file.
///
/// One reader serves every region query and mate lookup. Records are
/// streamed region by region, never collected.
///
pub struct BamSegmentRepository {
    reader: RefCell<BamReader>,
    header: sam::Header,
    counter: BamSegmentCounter,
}

impl BamSegmentRepository {
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = bam::io::indexed_reader::Builder::default().build_from_path(path)?;
        let header = reader.read_header()?;
        Ok(BamSegmentRepository {
            reader: RefCell::new(reader),
            header,
            counter: BamSegmentCounter::new(path),
        })
    }

    /// Decompression workers used when counting the whole file
    pub fn with_worker_count(mut self, worker_count: NonZeroUsize) -> Self {
        self.counter = self.counter.with_worker_count(worker_count);
        self
    }

    pub fn header(&self) -> &sam::Header {
        &self.header
    }

    fn records(&self, region: &GenomicRegion) -> Result<RegionRecords<'_>> {
        let query = to_region(region)?;
        let reference_id = self
            .header
            .reference_sequences()
            .get_index_of(region.chrom.as_bytes())
            .ok_or_else(|| {
                RearrangementError::SegmentSource(format!("{} is not a reference sequence of the BAM header", region.chrom))
            })?;

        let mut chunks: Vec<(VirtualPosition, VirtualPosition)> = self
            .reader
            .borrow()
            .index()
            .query(reference_id, query.interval())?
            .iter()
            .map(|chunk| (chunk.start(), chunk.end()))
            .collect();
        chunks.sort();

        Ok(RegionRecords {
            reader: &self.reader,
            header: &self.header,
            reference_id,
            start: region.start as usize,
            end: region.end as usize,
            chunks: chunks.into(),
            position: None,
            record: bam::Record::default(),
        })
    }

    fn segments<'a>(
        &'a self,
        region: &GenomicRegion,
        locations: GenomicRegions,
        exclude: Vec<ReadQuery>,
        min_quality: u8,
    ) -> SegmentIter<'a> {
        let records = match self.records(region) {
            Ok(records) => records,
            Err(err) => return Box::new(std::iter::once(Err(err))),
        };
        Box::new(records.filter_map(move |record| {
            match record.and_then(|record| to_segment(&self.header, &record, &locations)) {
                Ok(segment) if is_selected(&segment, &exclude, min_quality) => Some(Ok(segment)),
                Ok(_) => None,
                Err(err) => Some(Err(err)),
            }
        }))
    }
}

impl SegmentCounter for BamSegmentRepository {
    fn count_segments(&self, exclude: Option<&[ReadQuery]>) -> Result<u64> {
        self.counter.count_segments(exclude)
    }
}

impl SegmentRepository for BamSegmentRepository {
    fn fetch<'a>(
        &'a self,
        locations: &GenomicRegions,
        exclude: &[ReadQuery],
        min_quality: u8,
    ) -> Result<SegmentIter<'a>> {
        let regions: Vec<GenomicRegion> = locations.iter().cloned().collect();
        let locations = locations.clone();
        let exclude = exclude.to_vec();

        let segments = regions
            .into_iter()
            .flat_map(move |region| self.segments(&region, locations.clone(), exclude.clone(), min_quality));
        Ok(Box::new(segments))
    }

    fn mate_of(&self, segment: &PlacedSegment) -> Result<Option<PlacedSegment>> {
        let content = &segment.content;
        if content.is_supplementary() {
            return Ok(None);
        }
        let (Some(chrom), Some(position)) = (&content.mate_reference_name, content.mate_position) else {
            return Ok(None);
        };

        let region = GenomicRegion::new(chrom.clone(), position, position);
        let location = GenomicRegions::from([region.clone()]);
        for record in self.records(&region)? {
            let candidate = to_segment(&self.header, &record?, &location)?;
            let is_mate = candidate.read_name == segment.read_name
                && candidate.read_order != segment.read_order
                && !candidate.content.is_supplementary()
                && !candidate.content.has_flag(flags::SECONDARY);
            if is_mate {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn mate_exact_position(&self, segment: &PlacedSegment) -> Result<(String, u32)> {
        match (&segment.content.mate_reference_name, segment.content.mate_position) {
            (Some(chrom), Some(position)) => Ok((chrom.clone(), position)),
            _ => Err(RearrangementError::MissingMatePosition(segment.read_name.clone())),
        }
    }
}
