use std::time::Duration;

use crate::Indicator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Close the push channel once `after` has elapsed. Closing is idempotent.
    CloseChannel { after: Duration },
    /// Request one animation frame tagged with `generation`.
    ScheduleFrame {
        indicator: Indicator,
        generation: u64,
    },
    /// Drop every pending frame request for `indicator`.
    CancelFrames { indicator: Indicator },
}
