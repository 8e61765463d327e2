//! Syllabix core: pure job-progress state machine and view-model helpers.
mod animator;
mod effect;
mod event;
mod msg;
mod reducer;
mod resolver;
mod state;
mod update;
mod view;
mod view_model;

pub use animator::{
    ease_out_cubic, FrameOutcome, PageCounter, ProgressAnimator, DEFAULT_ANIMATION_DURATION,
};
pub use effect::Effect;
pub use event::{DecodeError, EventFields, EventKind, StreamEvent};
pub use msg::Msg;
pub use reducer::{merge_rules, reduce, Field, Merge, MergeRule, UNKNOWN_FAILURE};
pub use resolver::{stage_status, stage_statuses, StageStatus, PIPELINE};
pub use state::{JobId, ProcessingState, Stage};
pub use update::update;
pub use view::{JobView, ViewSettings, DEFAULT_CLOSE_GRACE};
pub use view_model::{ConnectionStatus, Indicator, IndicatorView, ProgressViewModel, StepView};
