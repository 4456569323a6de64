use std::collections::BTreeSet;
use std::rc::Rc;

use rearrscan_core::errors::{RearrangementError, Result};
use rearrscan_core::notifications::NotificationService;
use rearrscan_core::repositories::{RegionCatalog, SegmentRepository};
use rearrscan_core::{Rearrangement, RegionsName};

use crate::factories::{CallerArguments, CallerFeature, CallerType, RearrangementCallerFactory};

/// Options of a classification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// Also look for partners of DUX4 other than IGH
    Dux4Other,
    ProvidedReadCount,
    WithBlacklist,
    WithNotifications,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifyRequest {
    pub features: BTreeSet<Feature>,
    pub minimum_mapping_quality: Option<u8>,
    pub srpb_threshold: Option<f64>,
    pub total_number_of_reads: Option<u64>,
}

impl ClassifyRequest {
    fn caller_type(&self) -> CallerType {
        if self.features.contains(&Feature::Dux4Other) {
            CallerType::Multi
        } else {
            CallerType::Named
        }
    }

    fn caller_features(&self) -> BTreeSet<CallerFeature> {
        self.features
            .iter()
            .filter_map(|feature| match feature {
                Feature::Dux4Other => None,
                Feature::ProvidedReadCount => Some(CallerFeature::WithProvidedReadCount),
                Feature::WithBlacklist => Some(CallerFeature::WithBlacklist),
                Feature::WithNotifications => Some(CallerFeature::WithNotifications),
            })
            .collect()
    }

    fn caller_arguments(&self) -> CallerArguments {
        CallerArguments {
            minimum_mapping_quality: self.minimum_mapping_quality,
            srpb_threshold: self.srpb_threshold,
            total_number_of_reads: self.total_number_of_reads,
        }
    }
}

/// Everything a presenter needs to report a run
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyResult {
    pub reference: RegionsName,
    pub unique_mapped_reads: u64,
    pub rearrangements: Vec<Rearrangement>,
}

pub trait ClassifyPresenter {
    type Error: From<RearrangementError>;

    fn present(&mut self, result: &ClassifyResult) -> std::result::Result<(), Self::Error>;
}

///
/// Runs a classification: builds the callers for a [ClassifyRequest],
/// computes every rearrangement and hands the result to a presenter.
///
pub struct ClassifyInteractor {
    repository: Rc<dyn SegmentRepository>,
    catalog: Rc<dyn RegionCatalog>,
    notifications: Rc<dyn NotificationService>,
}

impl ClassifyInteractor {
    pub fn new(
        repository: Rc<dyn SegmentRepository>,
        catalog: Rc<dyn RegionCatalog>,
        notifications: Rc<dyn NotificationService>,
    ) -> Self {
        ClassifyInteractor {
            repository,
            catalog,
            notifications,
        }
    }

    pub fn classify(&self, request: &ClassifyRequest) -> Result<ClassifyResult> {
        let factory = RearrangementCallerFactory::new(
            self.repository.clone(),
            self.catalog.clone(),
            self.notifications.clone(),
        );
        let features = request.caller_features();
        let arguments = request.caller_arguments();
        let counter = factory.create_counter(&features, &arguments)?;
        let mut caller = factory.create(request.caller_type(), &features, &arguments, counter.clone())?;

        let rearrangements = caller
            .get_rearrangements()?
            .collect::<Result<Vec<Rearrangement>>>()?;
        let unique_mapped_reads = counter.count_segments(None)?;
        log::debug!("{} rearrangements over {} reads", rearrangements.len(), unique_mapped_reads);

        Ok(ClassifyResult {
            reference: RegionsName::GRCh38,
            unique_mapped_reads,
            rearrangements,
        })
    }

    pub fn get_rearrangement_evidence<P: ClassifyPresenter>(
        &self,
        request: &ClassifyRequest,
        presenter: &mut P,
    ) -> std::result::Result<(), P::Error> {
        let result = self.classify(request)?;
        presenter.present(&result)
    }
}
