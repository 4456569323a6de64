use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;

use rearrscan_callers::interactor::{ClassifyPresenter, ClassifyResult};
use rearrscan_core::notifications::NotificationService;
use rearrscan_core::{CompoundRegion, Rearrangement};

use crate::error::{RearrscanIoError, Result};

/// Who produced a report or an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub name: String,
    pub version: String,
    pub command_line: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RegionView {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CompoundRegionView {
    pub name: String,
    pub regions: Vec<RegionView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EvidenceView {
    pub paired_reads: usize,
    pub split_reads: usize,
    #[serde(rename = "SRPB")]
    pub srpb: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RearrangementView {
    pub id: String,
    #[serde(rename = "A")]
    pub a: CompoundRegionView,
    #[serde(rename = "B")]
    pub b: CompoundRegionView,
    pub evidence: EvidenceView,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ReportView {
    pub reference: String,
    pub unique_mapped_reads: u64,
    pub rearrangements: Vec<RearrangementView>,
    pub program_name: String,
    pub version: String,
    pub cli_command: String,
}

/// Two digit, 1-based identifier of the rearrangement at `index`
pub fn rearrangement_id(index: usize) -> String {
    format!("{:02}", index + 1)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<&CompoundRegion> for CompoundRegionView {
    fn from(compound_region: &CompoundRegion) -> Self {
        CompoundRegionView {
            name: compound_region.name.to_string(),
            regions: compound_region
                .regions
                .iter()
                .map(|region| RegionView {
                    chrom: region.chrom.clone(),
                    start: region.start,
                    end: region.end,
                })
                .collect(),
        }
    }
}

impl RearrangementView {
    pub fn new(index: usize, rearrangement: &Rearrangement) -> Self {
        RearrangementView {
            id: rearrangement_id(index),
            a: CompoundRegionView::from(&rearrangement.region_pair.a),
            b: CompoundRegionView::from(&rearrangement.region_pair.b),
            evidence: EvidenceView {
                paired_reads: rearrangement.counts.paired,
                split_reads: rearrangement.counts.split,
                srpb: round_to_hundredths(rearrangement.srpb),
            },
        }
    }
}

impl ReportView {
    pub fn new(result: &ClassifyResult, program: &ProgramInfo) -> Self {
        ReportView {
            reference: result.reference.to_string(),
            unique_mapped_reads: result.unique_mapped_reads,
            rearrangements: result
                .rearrangements
                .iter()
                .enumerate()
                .map(|(index, rearrangement)| RearrangementView::new(index, rearrangement))
                .collect(),
            program_name: program.name.clone(),
            version: program.version.clone(),
            cli_command: program.command_line.clone(),
        }
    }
}

///
/// Writes the result of a run as a pretty-printed JSON document.
///
pub struct JsonReportPresenter {
    path: PathBuf,
    program: ProgramInfo,
    notifications: Rc<dyn NotificationService>,
}

impl JsonReportPresenter {
    pub fn new(path: &Path, program: ProgramInfo, notifications: Rc<dyn NotificationService>) -> Self {
        JsonReportPresenter {
            path: path.to_path_buf(),
            program,
            notifications,
        }
    }
}

impl ClassifyPresenter for JsonReportPresenter {
    type Error = RearrscanIoError;

    fn present(&mut self, result: &ClassifyResult) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let view = ReportView::new(result, &self.program);
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &view)?;
        writeln!(writer)?;
        writer.flush()?;

        self.notifications.notify(&format!(
            "Analysis complete. Results are available in file '{}'.",
            self.path.display()
        ));
        Ok(())
    }
}

/// Runs several presenters in turn, stopping at the first failure
#[derive(Default)]
pub struct PresenterChain {
    presenters: Vec<Box<dyn ClassifyPresenter<Error = RearrscanIoError>>>,
}

impl PresenterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, presenter: Box<dyn ClassifyPresenter<Error = RearrscanIoError>>) -> Self {
        self.presenters.push(presenter);
        self
    }
}

impl ClassifyPresenter for PresenterChain {
    type Error = RearrscanIoError;

    fn present(&mut self, result: &ClassifyResult) -> Result<()> {
        for presenter in self.presenters.iter_mut() {
            presenter.present(result)?;
        }
        Ok(())
    }
}
