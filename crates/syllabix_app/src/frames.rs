use std::collections::BTreeMap;

use syllabix_core::Indicator;
use syllabix_logging::syllabix_trace;

/// Pending animation-frame requests, at most one per indicator.
///
/// The UI loop fires everything pending once per tick. A newer request for
/// the same indicator replaces the older one.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: BTreeMap<Indicator, u64>,
}

impl FrameScheduler {
    pub fn schedule(&mut self, indicator: Indicator, generation: u64) {
        syllabix_trace!("Frame requested for {:?} generation {}", indicator, generation);
        self.pending.insert(indicator, generation);
    }

    pub fn cancel(&mut self, indicator: Indicator) {
        self.pending.remove(&indicator);
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drains every pending request.
    pub fn take_due(&mut self) -> Vec<(Indicator, u64)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newer_request_replaces_older() {
        let mut frames = FrameScheduler::default();
        frames.schedule(Indicator::Pages, 1);
        frames.schedule(Indicator::Pages, 2);
        frames.schedule(Indicator::Files, 1);

        assert_eq!(
            frames.take_due(),
            vec![(Indicator::Pages, 2), (Indicator::Files, 1)]
        );
        assert!(frames.is_idle());
    }

    #[test]
    fn cancel_drops_pending_request() {
        let mut frames = FrameScheduler::default();
        frames.schedule(Indicator::Files, 3);
        frames.cancel(Indicator::Files);
        frames.cancel(Indicator::Pages);
        assert!(frames.take_due().is_empty());
    }
}
