use std::time::Duration;

use crate::animator::{PageCounter, ProgressAnimator, DEFAULT_ANIMATION_DURATION};
use crate::resolver::stage_statuses;
use crate::view_model::{
    ConnectionStatus, Indicator, IndicatorView, ProgressViewModel, StepView,
};
use crate::{JobId, ProcessingState};

pub const DEFAULT_CLOSE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub animation_duration: Duration,
    /// Delay between a terminal event and closing the channel, so the final
    /// state gets rendered first.
    pub close_grace: Duration,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            animation_duration: DEFAULT_ANIMATION_DURATION,
            close_grace: DEFAULT_CLOSE_GRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ChannelState {
    #[default]
    Open,
    Closing,
    Closed,
}

/// State owned by one open job view: canonical job state plus the
/// presentation-only pieces derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub(crate) job_id: JobId,
    pub(crate) settings: ViewSettings,
    pub(crate) processing: ProcessingState,
    pub(crate) connection: ConnectionStatus,
    pub(crate) channel: ChannelState,
    pub(crate) pages: ProgressAnimator,
    pub(crate) files: ProgressAnimator,
    pub(crate) page_counter: PageCounter,
    pub(crate) torn_down: bool,
    dirty: bool,
}

impl JobView {
    pub fn new(job_id: impl Into<JobId>, settings: ViewSettings) -> Self {
        Self {
            job_id: job_id.into(),
            settings,
            processing: ProcessingState::new(),
            connection: ConnectionStatus::Connecting,
            channel: ChannelState::Open,
            pages: ProgressAnimator::new(settings.animation_duration),
            files: ProgressAnimator::new(settings.animation_duration),
            page_counter: PageCounter::default(),
            torn_down: false,
            dirty: true,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn processing(&self) -> &ProcessingState {
        &self.processing
    }

    pub fn animator(&self, indicator: Indicator) -> &ProgressAnimator {
        match indicator {
            Indicator::Pages => &self.pages,
            Indicator::Files => &self.files,
        }
    }

    pub(crate) fn animator_mut(&mut self, indicator: Indicator) -> &mut ProgressAnimator {
        match indicator {
            Indicator::Pages => &mut self.pages,
            Indicator::Files => &mut self.files,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.pages.is_running() || self.files.is_running()
    }

    pub fn is_channel_closed(&self) -> bool {
        self.channel == ChannelState::Closed
    }

    /// True once nothing will change on screen without new input: the channel
    /// is gone and both bars have settled.
    pub fn is_settled(&self) -> bool {
        (self.torn_down || self.is_channel_closed()) && !self.is_animating()
    }

    pub fn view(&self) -> ProgressViewModel {
        ProgressViewModel {
            job_id: self.job_id.clone(),
            state: self.processing.clone(),
            steps: stage_statuses(self.processing.stage)
                .map(|(stage, status)| StepView { stage, status }),
            pages: indicator_view(&self.pages),
            files: indicator_view(&self.files),
            page_counter: self.page_counter.shown(),
            connection: self.connection.clone(),
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

fn indicator_view(animator: &ProgressAnimator) -> IndicatorView {
    IndicatorView {
        displayed: animator.displayed(),
        target: animator.target(),
    }
}
