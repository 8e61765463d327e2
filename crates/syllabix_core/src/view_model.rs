use crate::{JobId, ProcessingState, Stage, StageStatus};

/// Animated progress bars shown for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    /// Processed pages over total pages.
    Pages,
    /// Processed files over total files.
    Files,
}

impl Indicator {
    pub const ALL: [Indicator; 2] = [Indicator::Pages, Indicator::Files];
}

/// Health of the push channel, kept apart from the canonical job state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Live,
    Reconnecting { attempt: u32 },
    Disconnected { reason: String },
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub stage: Stage,
    pub status: StageStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorView {
    /// Smoothed value to draw, 0..=100.
    pub displayed: f64,
    /// Value the animation is heading to, 0..=100.
    pub target: f64,
}

/// Everything the presentation layer may read about a job.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressViewModel {
    pub job_id: JobId,
    pub state: ProcessingState,
    pub steps: [StepView; 3],
    pub pages: IndicatorView,
    pub files: IndicatorView,
    pub page_counter: u32,
    pub connection: ConnectionStatus,
}

impl ProgressViewModel {
    pub fn indicator(&self, indicator: Indicator) -> IndicatorView {
        match indicator {
            Indicator::Pages => self.pages,
            Indicator::Files => self.files,
        }
    }
}
