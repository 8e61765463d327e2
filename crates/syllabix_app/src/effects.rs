use syllabix_client::Subscription;
use syllabix_core::{Effect, Indicator};
use syllabix_logging::syllabix_debug;

use crate::frames::FrameScheduler;

/// Carries out the effects `update` asks for against one job's subscription.
pub struct EffectRunner {
    subscription: Subscription,
    frames: FrameScheduler,
}

impl EffectRunner {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription,
            frames: FrameScheduler::default(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CloseChannel { after } => {
                    syllabix_debug!(
                        "Closing stream for job {} in {:?}",
                        self.subscription.job_id(),
                        after
                    );
                    self.subscription.close_after(after);
                }
                Effect::ScheduleFrame {
                    indicator,
                    generation,
                } => self.frames.schedule(indicator, generation),
                Effect::CancelFrames { indicator } => self.frames.cancel(indicator),
            }
        }
    }

    pub fn due_frames(&mut self) -> Vec<(Indicator, u64)> {
        self.frames.take_due()
    }

    pub fn has_pending_frames(&self) -> bool {
        !self.frames.is_idle()
    }
}
