use std::time::{Duration, Instant};

use crate::{Indicator, StreamEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Decoded message from the push channel, stamped with its receipt time.
    Received { event: StreamEvent, at: Instant },
    /// The channel delivered a payload that failed to decode.
    Malformed { reason: String },
    /// The channel connected and is streaming.
    ChannelOpened,
    /// The channel dropped; a reconnect attempt is scheduled after `delay`.
    Reconnecting { attempt: u32, delay: Duration },
    /// The channel failed for good.
    ChannelFailed { reason: String },
    /// The channel shut down.
    ChannelClosed,
    /// Animation frame for one progress indicator.
    Frame {
        indicator: Indicator,
        generation: u64,
        at: Instant,
    },
    /// The owning view is being torn down.
    ViewClosed,
}
