//!
//! Export of the segments supporting each rearrangement as SAM files, one
//! file per rearrangement, named after the rearrangement identifier and its
//! two compound regions (`01_CoreDUX4-IGH.sam`).
//!
//! Every export carries the header of the input file plus one `@PG` line
//! describing this run, chained to the last program already in the header.
//!
use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use noodles::sam;
use noodles::sam::alignment::io::Write;

use rearrscan_callers::interactor::{ClassifyPresenter, ClassifyResult};
use rearrscan_core::notifications::NotificationService;
use rearrscan_core::{PlacedSegment, Rearrangement};

use crate::error::{RearrscanIoError, Result};
use crate::report::{ProgramInfo, rearrangement_id};

/// File name of the export of the rearrangement at `index`
pub fn export_file_name(index: usize, rearrangement: &Rearrangement) -> String {
    let (a, b) = rearrangement.region_pair.names();
    format!("{}_{}-{}.sam", rearrangement_id(index), a, b)
}

fn header_value(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// IDs of the `@PG` lines of a SAM header text, in order
fn program_ids(header: &str) -> Vec<&str> {
    header
        .lines()
        .filter(|line| line.starts_with("@PG\t"))
        .filter_map(|line| line.split('\t').find_map(|field| field.strip_prefix("ID:")))
        .collect()
}

/// `name`, or `name.N` with the first N not taken yet
fn unique_program_id(name: &str, taken: &[&str]) -> String {
    if !taken.contains(&name) {
        return name.to_string();
    }
    (1..)
        .map(|increment| format!("{}.{}", name, increment))
        .find(|id| !taken.contains(&id.as_str()))
        .unwrap_or_else(|| name.to_string())
}

/// One SAM text line for `segment`, optional fields included
fn sam_line(segment: &PlacedSegment) -> String {
    let content = &segment.content;
    let or_star = |value: &str| if value.is_empty() { "*".to_string() } else { value.to_string() };

    let mut fields = vec![
        segment.read_name.clone(),
        content.flags.to_string(),
        content.reference_name.clone().unwrap_or_else(|| "*".to_string()),
        content.position.unwrap_or(0).to_string(),
        content.mapping_quality.unwrap_or(255).to_string(),
        or_star(&content.cigar),
        content.mate_reference_name.clone().unwrap_or_else(|| "*".to_string()),
        content.mate_position.unwrap_or(0).to_string(),
        content.template_length.to_string(),
        or_star(&content.sequence),
        or_star(&content.quality_scores),
    ];
    fields.extend(content.tags.iter().cloned());
    fields.join("\t")
}

///
/// Writes every supporting segment of every rearrangement into its own SAM
/// file inside an export directory.
///
pub struct SamExportPresenter {
    directory: PathBuf,
    header: sam::Header,
    program: ProgramInfo,
    notifications: Rc<dyn NotificationService>,
}

impl SamExportPresenter {
    pub fn new(
        directory: &Path,
        header: sam::Header,
        program: ProgramInfo,
        notifications: Rc<dyn NotificationService>,
    ) -> Self {
        SamExportPresenter {
            directory: directory.to_path_buf(),
            header,
            program,
            notifications,
        }
    }

    ///
    /// The input header with a `@PG` line for this run. The ID is the program
    /// name, suffixed `.1`, `.2`, ... when already taken. `PP` points at the
    /// last program of the input header.
    ///
    fn header(&self, rearrangement: &Rearrangement) -> Result<sam::Header> {
        let mut writer = sam::io::Writer::new(Vec::new());
        writer.write_header(&self.header)?;
        let mut text = String::from_utf8_lossy(writer.get_ref()).into_owned();

        let taken = program_ids(&text);
        let name = header_value(&self.program.name);
        let id = unique_program_id(&name, &taken);
        let (a, b) = rearrangement.region_pair.names();

        let mut program = format!(
            "@PG\tID:{}\tPN:{}\tVN:{}\tCL:{}\tDS:region_a:{}  region_b:{}",
            id,
            name,
            header_value(&self.program.version),
            header_value(&self.program.command_line),
            a,
            b,
        );
        if let Some(previous) = taken.last() {
            program.push_str(&format!("\tPP:{}", previous));
        }
        text.push_str(&program);
        text.push('\n');

        text.parse::<sam::Header>()
            .map_err(|err| RearrscanIoError::InvalidSamHeader(err.to_string()))
    }

    fn to_record(segment: &PlacedSegment) -> Result<sam::Record> {
        let line = sam_line(segment);
        let mut reader = sam::io::Reader::new(line.as_bytes());
        let mut record = sam::Record::default();
        reader.read_record(&mut record)?;
        Ok(record)
    }

    fn export(&self, index: usize, rearrangement: &Rearrangement) -> Result<PathBuf> {
        let header = self.header(rearrangement)?;
        let path = self.directory.join(export_file_name(index, rearrangement));
        let mut writer = sam::io::Writer::new(BufWriter::new(File::create(&path)?));
        writer.write_header(&header)?;

        // segments are ordered by read name first
        for segment in &rearrangement.segments {
            let record = Self::to_record(segment)?;
            writer.write_alignment_record(&header, &record)?;
        }
        writer.get_mut().flush()?;
        Ok(path)
    }
}

impl ClassifyPresenter for SamExportPresenter {
    type Error = RearrscanIoError;

    fn present(&mut self, result: &ClassifyResult) -> Result<()> {
        fs::create_dir_all(&self.directory)?;

        for (index, rearrangement) in result.rearrangements.iter().enumerate() {
            let path = self.export(index, rearrangement)?;
            log::info!(
                "{} supporting segments exported to {}",
                rearrangement.segments.len(),
                path.display()
            );
        }
        self.notifications.notify(&format!(
            "SAM file exports complete. Results are available in folder '{}'.",
            self.directory.display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rearrscan_core::notifications::SimpleNotificationService;
    use rearrscan_core::{
        AlignmentRecord, ClassifiedSegmentCount, CompoundRegion, CompoundRegionPair, GenomicRegion,
        GenomicRegions, ReadOrder, RegionsName,
    };
    use rstest::*;
    use std::collections::BTreeSet;

    const INPUT_HEADER: &str = "@HD\tVN:1.6\tSO:coordinate\n\
        @SQ\tSN:chr4\tLN:190214555\n\
        @SQ\tSN:chr14\tLN:107043718\n\
        @RG\tID:sample1\tSM:sample1\n\
        @PG\tID:bwa\tPN:bwa\tVN:0.7.17\n\
        @PG\tID:rearrscan\tPN:rearrscan\tPP:bwa\n\
        @CO\tlibrary prepared in house\n";

    #[fixture]
    fn program() -> ProgramInfo {
        ProgramInfo {
            name: "rearrscan".to_string(),
            version: "0.1.0".to_string(),
            command_line: "rearrscan dux4r\tsample.bam".to_string(),
        }
    }

    #[fixture]
    fn input_header() -> sam::Header {
        INPUT_HEADER.parse().unwrap()
    }

    fn segment(name: &str, order: ReadOrder, chrom: &str, position: u32) -> PlacedSegment {
        let location = GenomicRegions::from([
            GenomicRegion::new("chr4", 1, 5000),
            GenomicRegion::new("chr14", 1, 5000),
        ]);
        let (flags, mate_chrom) = match order {
            ReadOrder::One => (0x41, "chr14"),
            ReadOrder::Two => (0x81, "chr4"),
        };
        PlacedSegment::new(name, location, order).with_content(AlignmentRecord {
            flags,
            reference_name: Some(chrom.to_string()),
            position: Some(position),
            mapping_quality: Some(60),
            cigar: "2S4M".to_string(),
            mate_reference_name: Some(mate_chrom.to_string()),
            mate_position: Some(1000),
            template_length: 0,
            sequence: "NNACGT".to_string(),
            quality_scores: "##??II".to_string(),
            tags: vec![
                "RG:Z:sample1".to_string(),
                format!("SA:Z:{},3000,+,4M2S,60,0;", mate_chrom),
            ],
        })
    }

    fn rearrangement(segments: BTreeSet<PlacedSegment>) -> Rearrangement {
        let a = CompoundRegion::new(
            RegionsName::CoreDUX4,
            GenomicRegions::from([GenomicRegion::new("chr4", 1, 5000)]),
        );
        let b = CompoundRegion::new(
            RegionsName::IGH,
            GenomicRegions::from([GenomicRegion::new("chr14", 1, 5000)]),
        );
        Rearrangement::new(
            CompoundRegionPair::new(a, b),
            ClassifiedSegmentCount::new(2, 0, 2),
            20.0,
            segments,
        )
    }

    #[rstest]
    fn test_export_file_name() {
        assert_eq!(export_file_name(0, &rearrangement(BTreeSet::new())), "01_CoreDUX4-IGH.sam");
    }

    #[rstest]
    #[case("rearrscan", &["bwa"], "rearrscan")]
    #[case("rearrscan", &["bwa", "rearrscan"], "rearrscan.1")]
    #[case("rearrscan", &["rearrscan", "rearrscan.1"], "rearrscan.2")]
    fn test_unique_program_id(#[case] name: &str, #[case] taken: &[&str], #[case] expected: &str) {
        assert_eq!(unique_program_id(name, taken), expected);
    }

    #[rstest]
    fn test_program_ids() {
        assert_eq!(program_ids(INPUT_HEADER), vec!["bwa", "rearrscan"]);
    }

    #[rstest]
    fn test_sam_line_of_unmapped_segment() {
        let segment = PlacedSegment::new("A", GenomicRegions::new(), ReadOrder::Two).with_content(AlignmentRecord {
            flags: 0x85,
            ..Default::default()
        });
        assert_eq!(sam_line(&segment), "A\t133\t*\t0\t255\t*\t*\t0\t0\t*\t*");
    }

    #[rstest]
    fn test_export(program: ProgramInfo, input_header: sam::Header) {
        let tempdir = tempfile::tempdir().unwrap();
        let directory = tempdir.path().join("export");
        let segments = BTreeSet::from([
            segment("B", ReadOrder::Two, "chr14", 1000),
            segment("A", ReadOrder::One, "chr4", 2000),
            segment("A", ReadOrder::Two, "chr14", 1000),
        ]);
        let result = ClassifyResult {
            reference: RegionsName::GRCh38,
            unique_mapped_reads: 1000,
            rearrangements: vec![rearrangement(segments)],
        };
        let notifications = Rc::new(SimpleNotificationService::new(true));

        let mut presenter = SamExportPresenter::new(&directory, input_header, program, notifications.clone());
        presenter.present(&result).unwrap();

        let content = fs::read_to_string(directory.join("01_CoreDUX4-IGH.sam")).unwrap();
        let (header, records): (Vec<&str>, Vec<&str>) = content.lines().partition(|line| line.starts_with('@'));

        assert!(header[0].starts_with("@HD"));
        assert_eq!(header.iter().filter(|line| line.starts_with("@SQ")).count(), 2);
        assert!(header.iter().any(|line| line.starts_with("@RG\tID:sample1")));
        assert!(header.iter().any(|line| line.starts_with("@CO")));

        let programs: Vec<&&str> = header.iter().filter(|line| line.starts_with("@PG")).collect();
        assert_eq!(programs.len(), 3);
        let added = programs
            .iter()
            .find(|line| line.contains("ID:rearrscan.1"))
            .unwrap();
        assert!(added.contains("PN:rearrscan"));
        assert!(added.contains("PP:rearrscan"));
        assert!(added.contains("CL:rearrscan dux4r sample.bam"));
        assert!(added.contains("DS:region_a:CoreDUX4  region_b:IGH"));

        let fields: Vec<Vec<&str>> = records.iter().map(|line| line.split('\t').collect()).collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.iter().map(|f| f[0]).collect::<Vec<_>>(), vec!["A", "A", "B"]);
        assert_eq!(&fields[0][1..6], &["65", "chr4", "2000", "60", "2S4M"]);
        assert_eq!(fields[0][9], "NNACGT");
        assert_eq!(fields[0][10], "##??II");
        assert!(fields[0][11..].contains(&"RG:Z:sample1"));
        assert!(fields[0][11..].contains(&"SA:Z:chr14,3000,+,4M2S,60,0;"));

        assert_eq!(
            notifications.messages(),
            vec![format!(
                "SAM file exports complete. Results are available in folder '{}'.",
                directory.display()
            )]
        );
    }
}
