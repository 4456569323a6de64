use std::rc::Rc;

use rearrscan_core::errors::Result;
use rearrscan_core::notifications::NotificationService;
use rearrscan_core::repositories::SegmentIter;
use rearrscan_core::{ClassifiedSegmentCount, CompoundRegionPair, GenomicRegions, RegionsName};

use crate::read_callers::ReadsCaller;
use crate::region_pair_callers::{CompoundRegionPairCaller, RegionPairIter};

pub const FINDING_EVIDENCE_MESSAGE: &str = "Finding evidence for rearrangement.";

/// Label shown in place of UNNAMED regions
pub const CANDIDATE_REGION_LABEL: &str = "candidate-region";

pub fn region_pair_message(pair: &CompoundRegionPair) -> String {
    let b = match pair.b.name {
        RegionsName::UNNAMED => CANDIDATE_REGION_LABEL,
        name => name.as_str(),
    };
    format!("Retrieving region coordinates for {}/{}.", pair.a.name, b)
}

/// Announces every region pair as it is produced
pub struct NotifyRegionPairCaller {
    caller: Box<dyn CompoundRegionPairCaller>,
    notifications: Rc<dyn NotificationService>,
}

impl NotifyRegionPairCaller {
    pub fn new(caller: Box<dyn CompoundRegionPairCaller>, notifications: Rc<dyn NotificationService>) -> Self {
        NotifyRegionPairCaller { caller, notifications }
    }
}

impl CompoundRegionPairCaller for NotifyRegionPairCaller {
    fn get_compound_region_pairs(&mut self) -> Result<RegionPairIter<'_>> {
        let notifications = self.notifications.clone();
        let pairs = self.caller.get_compound_region_pairs()?.inspect(move |pair| {
            if let Ok(pair) = pair {
                notifications.notify(&region_pair_message(pair));
            }
        });
        Ok(Box::new(pairs))
    }
}

/// Announces every detection before running it
pub struct NotifyReadsCaller {
    caller: Box<dyn ReadsCaller>,
    notifications: Rc<dyn NotificationService>,
}

impl NotifyReadsCaller {
    pub fn new(caller: Box<dyn ReadsCaller>, notifications: Rc<dyn NotificationService>) -> Self {
        NotifyReadsCaller { caller, notifications }
    }
}

impl ReadsCaller for NotifyReadsCaller {
    fn detect_reads_spanning_regions(&mut self, a: &GenomicRegions, b: &GenomicRegions) -> Result<()> {
        self.notifications.notify(FINDING_EVIDENCE_MESSAGE);
        self.caller.detect_reads_spanning_regions(a, b)
    }

    fn get_segment_count(&self) -> ClassifiedSegmentCount {
        self.caller.get_segment_count()
    }

    fn get_segments_of_spanning_reads(&self) -> SegmentIter<'_> {
        self.caller.get_segments_of_spanning_reads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_callers::SpanningReadsCaller;
    use crate::region_pair_callers::NamedRegionPairCaller;
    use crate::testing::TestCatalog;
    use pretty_assertions::assert_eq;
    use rearrscan_core::memory::InMemorySegmentRepository;
    use rearrscan_core::notifications::SimpleNotificationService;
    use rearrscan_core::repositories::RegionCatalog;
    use rearrscan_core::{CompoundRegion, GenomicRegion};
    use rstest::*;

    #[rstest]
    #[case(RegionsName::IGH, "Retrieving region coordinates for CoreDUX4/IGH.")]
    #[case(RegionsName::UNNAMED, "Retrieving region coordinates for CoreDUX4/candidate-region.")]
    fn test_region_pair_message(#[case] b: RegionsName, #[case] expected: &str) {
        let a = CompoundRegion::new(RegionsName::CoreDUX4, GenomicRegions::new());
        let b = CompoundRegion::new(b, GenomicRegions::from([GenomicRegion::new("chr1", 1, 1000)]));
        assert_eq!(region_pair_message(&CompoundRegionPair::new(a, b)), expected);
    }

    #[rstest]
    fn test_notify_region_pair_caller_is_lazy() {
        let service = Rc::new(SimpleNotificationService::new(true));
        let catalog: Rc<dyn RegionCatalog> = Rc::new(TestCatalog::new());
        let mut caller = NotifyRegionPairCaller::new(
            Box::new(NamedRegionPairCaller::with_default_pairs(catalog)),
            service.clone(),
        );

        let mut pairs = caller.get_compound_region_pairs().unwrap();
        assert!(service.messages().is_empty());
        let first = pairs.next().unwrap().unwrap();
        assert_eq!(first.names(), (RegionsName::CoreDUX4, RegionsName::IGH));
        assert_eq!(service.messages(), vec!["Retrieving region coordinates for CoreDUX4/IGH."]);
        pairs.next();
        assert_eq!(service.messages().len(), 2);
    }

    #[rstest]
    fn test_notify_reads_caller() {
        let service = Rc::new(SimpleNotificationService::new(true));
        let mut caller = NotifyReadsCaller::new(
            Box::new(SpanningReadsCaller::new(Rc::new(InMemorySegmentRepository::default()), 0)),
            service.clone(),
        );
        let a = GenomicRegions::from([GenomicRegion::new("chr4", 1001, 2000)]);
        let b = GenomicRegions::from([GenomicRegion::new("chr14", 5001, 8000)]);

        caller.detect_reads_spanning_regions(&a, &b).unwrap();
        assert_eq!(caller.get_segment_count(), ClassifiedSegmentCount::default());
        assert_eq!(caller.get_segments_of_spanning_reads().count(), 0);
        assert_eq!(service.messages(), vec![FINDING_EVIDENCE_MESSAGE]);
    }
}
