use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::ArgMatches;

use rearrscan_callers::interactor::{ClassifyInteractor, ClassifyRequest, Feature};
use rearrscan_core::catalog::BuiltinRegionCatalog;
use rearrscan_core::notifications::{
    LogNotificationService, NotificationService, SimpleNotificationService,
};
use rearrscan_core::repositories::RegionCatalog;
use rearrscan_io::bam::BamSegmentRepository;
use rearrscan_io::bed::BlacklistRegionCatalog;
use rearrscan_io::export::SamExportPresenter;
use rearrscan_io::report::{JsonReportPresenter, PresenterChain, ProgramInfo};

use crate::consts::{PKG_NAME, VERSION};

/// Translate the command line into a classification request
pub fn build_request(matches: &ArgMatches) -> ClassifyRequest {
    let mut features = BTreeSet::new();
    let mut request = ClassifyRequest::default();

    if !matches.get_flag("only-igh-dux4") {
        features.insert(Feature::Dux4Other);
        request.srpb_threshold = matches.get_one::<f64>("srpb-threshold").copied();
        request.minimum_mapping_quality = matches.get_one::<u8>("minimum-mapq").copied();
    }

    if let Some(total) = matches.get_one::<u64>("total-number-reads") {
        features.insert(Feature::ProvidedReadCount);
        request.total_number_of_reads = Some(*total);
    }

    if matches.get_one::<String>("filter-regions").is_some() {
        features.insert(Feature::WithBlacklist);
    }

    if !matches.get_flag("silent") {
        features.insert(Feature::WithNotifications);
    }

    request.features = features;
    request
}

fn command_line() -> String {
    std::env::args().collect::<Vec<String>>().join(" ")
}

fn build_catalog(filter_regions: Option<&String>) -> Result<Rc<dyn RegionCatalog>> {
    let builtin = BuiltinRegionCatalog::new();
    match filter_regions {
        Some(path) => {
            let catalog = BlacklistRegionCatalog::from_path(Path::new(path), Box::new(builtin))
                .with_context(|| format!("Failed to load regions to filter from {}", path))?;
            Ok(Rc::new(catalog))
        }
        None => Ok(Rc::new(builtin)),
    }
}

pub fn run_dux4r(matches: &ArgMatches) -> Result<()> {
    let infile = matches
        .get_one::<String>("infile")
        .context("A path to an indexed BAM file is required.")?;
    let json = matches
        .get_one::<String>("json")
        .context("A path to the JSON report is required.")?;
    let silent = matches.get_flag("silent");

    let threads = matches.get_one::<usize>("threads").copied().unwrap_or(1);
    let worker_count = NonZeroUsize::new(threads).context("--threads must be at least 1.")?;

    let notifications: Rc<dyn NotificationService> = if silent {
        Rc::new(SimpleNotificationService::new(true))
    } else {
        Rc::new(LogNotificationService)
    };

    let repository = BamSegmentRepository::from_path(Path::new(infile))
        .with_context(|| format!("Failed to open {}", infile))?
        .with_worker_count(worker_count);
    let catalog = build_catalog(matches.get_one::<String>("filter-regions"))?;

    let program = ProgramInfo {
        name: PKG_NAME.to_string(),
        version: VERSION.to_string(),
        command_line: command_line(),
    };

    let mut presenter = PresenterChain::new().with(Box::new(JsonReportPresenter::new(
        Path::new(json),
        program.clone(),
        notifications.clone(),
    )));
    if let Some(export) = matches.get_one::<String>("export") {
        presenter = presenter.with(Box::new(SamExportPresenter::new(
            Path::new(export),
            repository.header().clone(),
            program,
            notifications.clone(),
        )));
    }

    let request = build_request(matches);
    log::debug!("{:?}", request);

    let interactor = ClassifyInteractor::new(Rc::new(repository), catalog, notifications);
    interactor
        .get_rearrangement_evidence(&request, &mut presenter)
        .with_context(|| format!("Failed to find DUX4 rearrangements in {}", infile))?;

    Ok(())
}
