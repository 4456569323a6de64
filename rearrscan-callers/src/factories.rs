use std::collections::BTreeSet;
use std::rc::Rc;

use rearrscan_core::errors::{RearrangementError, Result};
use rearrscan_core::notifications::{NotificationService, NotifyingSegmentCounter};
use rearrscan_core::repositories::{
    CachedSegmentCounter, ProvidedSegmentCounter, ReadQuery, RegionCatalog, SegmentCounter,
    SegmentRepository,
};
use rearrscan_core::RegionsName;

use crate::notifications::{NotifyReadsCaller, NotifyRegionPairCaller};
use crate::read_callers::{ReadsCaller, SpanningReadsCaller};
use crate::rearrangement_callers::{
    MultiRearrangementCaller, RearrangementCaller, RegionRearrangementCaller,
    SelectableRearrangementCaller, SortedRearrangementCaller,
};
use crate::region_callers::CandidateRegionCaller;
use crate::region_pair_callers::{BaitRegionPairCaller, CompoundRegionPairCaller, NamedRegionPairCaller};
use crate::selectors::{SelectorFactory, SrpbRearrangementSelector};
use crate::sorters::SrpbSorter;

/// Region used to look for unknown partners
pub const BAIT_REGION: RegionsName = RegionsName::CoreDUX4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerType {
    /// The default named region pairs
    Named,
    /// The bait region against every candidate partner
    Bait,
    /// Bait pairs at or above the SRPB threshold
    Selectable,
    /// Named pairs, then sorted selectable bait pairs
    Multi,
    /// Selectable bait pairs, highest SRPB first
    SrpbSorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallerFeature {
    WithProvidedReadCount,
    WithBlacklist,
    WithNotifications,
}

/// Values some caller compositions require
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CallerArguments {
    pub minimum_mapping_quality: Option<u8>,
    pub srpb_threshold: Option<f64>,
    pub total_number_of_reads: Option<u64>,
}

/// Lets a repository be used where only a counter is needed
struct RepositoryCounter {
    repository: Rc<dyn SegmentRepository>,
}

impl SegmentCounter for RepositoryCounter {
    fn count_segments(&self, exclude: Option<&[ReadQuery]>) -> Result<u64> {
        self.repository.count_segments(exclude)
    }
}

///
/// Builds composed [RearrangementCaller]s. Missing arguments are reported
/// when building, never while calling.
///
pub struct RearrangementCallerFactory {
    repository: Rc<dyn SegmentRepository>,
    catalog: Rc<dyn RegionCatalog>,
    notifications: Rc<dyn NotificationService>,
}

impl RearrangementCallerFactory {
    pub fn new(
        repository: Rc<dyn SegmentRepository>,
        catalog: Rc<dyn RegionCatalog>,
        notifications: Rc<dyn NotificationService>,
    ) -> Self {
        RearrangementCallerFactory {
            repository,
            catalog,
            notifications,
        }
    }

    ///
    /// The counter of mapped reads: the provided total with
    /// [CallerFeature::WithProvidedReadCount], otherwise a cached count
    /// of the repository.
    ///
    pub fn create_counter(
        &self,
        features: &BTreeSet<CallerFeature>,
        arguments: &CallerArguments,
    ) -> Result<Rc<dyn SegmentCounter>> {
        if features.contains(&CallerFeature::WithProvidedReadCount) {
            let total = arguments
                .total_number_of_reads
                .ok_or(RearrangementError::MissingArgument("total_number_of_reads"))?;
            return Ok(Rc::new(ProvidedSegmentCounter::new(total)));
        }

        let mut counter: Box<dyn SegmentCounter> = Box::new(RepositoryCounter {
            repository: self.repository.clone(),
        });
        if features.contains(&CallerFeature::WithNotifications) {
            counter = Box::new(NotifyingSegmentCounter::new(counter, self.notifications.clone()));
        }
        Ok(Rc::new(CachedSegmentCounter::new(counter)))
    }

    pub fn create(
        &self,
        caller_type: CallerType,
        features: &BTreeSet<CallerFeature>,
        arguments: &CallerArguments,
        counter: Rc<dyn SegmentCounter>,
    ) -> Result<Box<dyn RearrangementCaller>> {
        let caller: Box<dyn RearrangementCaller> = match caller_type {
            CallerType::Named => {
                let pairs = NamedRegionPairCaller::with_default_pairs(self.catalog.clone());
                Box::new(self.region_caller(Box::new(pairs), 0, features, counter))
            }
            CallerType::Bait => {
                let min_quality = arguments
                    .minimum_mapping_quality
                    .ok_or(RearrangementError::MissingArgument("minimum_mapping_quality"))?;
                let selectors = SelectorFactory::new(self.catalog.clone())
                    .candidate_region_selectors(features.contains(&CallerFeature::WithBlacklist));
                let candidates = CandidateRegionCaller::new(self.repository.clone(), selectors);
                let pairs = BaitRegionPairCaller::new(self.catalog.clone(), BAIT_REGION, candidates);
                Box::new(self.region_caller(Box::new(pairs), min_quality, features, counter))
            }
            CallerType::Selectable => {
                let threshold = arguments
                    .srpb_threshold
                    .ok_or(RearrangementError::MissingArgument("srpb_threshold"))?;
                let bait = self.create(CallerType::Bait, features, arguments, counter)?;
                Box::new(SelectableRearrangementCaller::new(
                    bait,
                    Box::new(SrpbRearrangementSelector::new(threshold)),
                ))
            }
            CallerType::SrpbSorted => {
                let selectable = self.create(CallerType::Selectable, features, arguments, counter)?;
                Box::new(SortedRearrangementCaller::new(selectable, Box::new(SrpbSorter)))
            }
            CallerType::Multi => {
                let named = self.create(CallerType::Named, features, arguments, counter.clone())?;
                let sorted = self.create(CallerType::SrpbSorted, features, arguments, counter)?;
                Box::new(MultiRearrangementCaller::new(vec![named, sorted]))
            }
        };
        Ok(caller)
    }

    fn region_caller(
        &self,
        pairs: Box<dyn CompoundRegionPairCaller>,
        min_quality: u8,
        features: &BTreeSet<CallerFeature>,
        counter: Rc<dyn SegmentCounter>,
    ) -> RegionRearrangementCaller {
        let mut pairs = pairs;
        let mut reads: Box<dyn ReadsCaller> =
            Box::new(SpanningReadsCaller::new(self.repository.clone(), min_quality));
        if features.contains(&CallerFeature::WithNotifications) {
            pairs = Box::new(NotifyRegionPairCaller::new(pairs, self.notifications.clone()));
            reads = Box::new(NotifyReadsCaller::new(reads, self.notifications.clone()));
        }
        RegionRearrangementCaller::new(pairs, reads, counter)
    }
}
