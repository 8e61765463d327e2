use std::time::{Duration, Instant};

use syllabix_logging::{syllabix_debug, syllabix_info, syllabix_trace, syllabix_warn};

use crate::animator::FrameOutcome;
use crate::view::ChannelState;
use crate::{reduce, ConnectionStatus, Effect, Indicator, JobView, Msg, Stage, StreamEvent};

/// Pure update function: applies a message to the job view and returns any effects.
pub fn update(mut view: JobView, msg: Msg) -> (JobView, Vec<Effect>) {
    if view.torn_down {
        return (view, Vec::new());
    }

    let effects = match msg {
        Msg::Received { event, at } => apply_event(&mut view, event, at),
        Msg::Malformed { reason } => {
            syllabix_warn!("Discarding malformed message for job {}: {}", view.job_id, reason);
            Vec::new()
        }
        Msg::ChannelOpened => {
            if view.channel != ChannelState::Closed {
                view.connection = ConnectionStatus::Live;
                view.mark_dirty();
            }
            Vec::new()
        }
        Msg::Reconnecting { attempt, delay } if channel_winding_down(&view) => {
            syllabix_debug!(
                "Job {} ignoring reconnect attempt {} in {:?} after the job ended",
                view.job_id,
                attempt,
                delay
            );
            Vec::new()
        }
        Msg::Reconnecting { attempt, delay } => {
            syllabix_info!(
                "Job {} channel dropped, reconnect attempt {} in {:?}",
                view.job_id,
                attempt,
                delay
            );
            view.connection = ConnectionStatus::Reconnecting { attempt };
            view.mark_dirty();
            Vec::new()
        }
        Msg::ChannelFailed { reason } if channel_winding_down(&view) => {
            syllabix_debug!(
                "Job {} channel failed after the job ended: {}",
                view.job_id,
                reason
            );
            Vec::new()
        }
        Msg::ChannelFailed { reason } => {
            syllabix_warn!("Job {} channel failed: {}", view.job_id, reason);
            view.connection = ConnectionStatus::Disconnected { reason };
            view.mark_dirty();
            close_now(&mut view)
        }
        Msg::ChannelClosed => {
            view.channel = ChannelState::Closed;
            if !matches!(view.connection, ConnectionStatus::Disconnected { .. }) {
                view.connection = ConnectionStatus::Closed;
            }
            view.mark_dirty();
            Vec::new()
        }
        Msg::Frame {
            indicator,
            generation,
            at,
        } => {
            let outcome = view.animator_mut(indicator).on_frame(generation, at);
            frame_effects(&mut view, indicator, generation, outcome)
        }
        Msg::ViewClosed => {
            view.torn_down = true;
            let mut effects = Vec::with_capacity(Indicator::ALL.len() + 1);
            for indicator in Indicator::ALL {
                view.animator_mut(indicator).stop();
                effects.push(Effect::CancelFrames { indicator });
            }
            effects.extend(close_now(&mut view));
            view.connection = ConnectionStatus::Closed;
            effects
        }
    };

    (view, effects)
}

fn frame_effects(
    view: &mut JobView,
    indicator: Indicator,
    generation: u64,
    outcome: FrameOutcome,
) -> Vec<Effect> {
    match outcome {
        FrameOutcome::Continue => {
            view.mark_dirty();
            vec![Effect::ScheduleFrame {
                indicator,
                generation,
            }]
        }
        FrameOutcome::Settled => {
            syllabix_trace!(
                "{:?} settled at {:.1} (frame {})",
                indicator,
                view.animator(indicator).displayed(),
                syllabix_logging::current_frame()
            );
            view.mark_dirty();
            Vec::new()
        }
        FrameOutcome::Stale => Vec::new(),
    }
}

fn apply_event(view: &mut JobView, event: StreamEvent, at: Instant) -> Vec<Effect> {
    if view.processing.is_terminal() {
        syllabix_debug!(
            "Job {} already {}, ignoring {}",
            view.job_id,
            view.processing.stage,
            event.kind
        );
        return Vec::new();
    }

    let previous_stage = view.processing.stage;
    view.processing = reduce(std::mem::take(&mut view.processing), &event);
    view.mark_dirty();
    if matches!(
        view.connection,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting { .. }
    ) {
        view.connection = ConnectionStatus::Live;
    }
    if view.processing.stage != previous_stage {
        syllabix_info!(
            "Job {} stage {} -> {}",
            view.job_id,
            previous_stage,
            view.processing.stage
        );
    }

    view.page_counter.observe(
        view.processing.current_page,
        view.processing.current_file.as_deref(),
    );

    let mut effects = Vec::new();
    for indicator in Indicator::ALL {
        let target = target_percent(view, indicator);
        if let Some(generation) = view.animator_mut(indicator).retarget(target, at) {
            syllabix_debug!("{:?} retarget to {:.1} (gen {})", indicator, target, generation);
            effects.push(Effect::CancelFrames { indicator });
            effects.push(Effect::ScheduleFrame {
                indicator,
                generation,
            });
        }
    }

    if view.processing.is_terminal() && view.channel == ChannelState::Open {
        view.channel = ChannelState::Closing;
        effects.push(Effect::CloseChannel {
            after: view.settings.close_grace,
        });
    }
    effects
}

/// Once the job is terminal or the channel is closing, transport trouble no
/// longer matters to the view.
fn channel_winding_down(view: &JobView) -> bool {
    view.channel != ChannelState::Open || view.processing.is_terminal()
}

fn close_now(view: &mut JobView) -> Vec<Effect> {
    if view.channel == ChannelState::Closed {
        return Vec::new();
    }
    view.channel = ChannelState::Closed;
    vec![Effect::CloseChannel {
        after: Duration::ZERO,
    }]
}

fn target_percent(view: &JobView, indicator: Indicator) -> f64 {
    let state = &view.processing;
    match indicator {
        Indicator::Pages => ratio_percent(indicator, state.processed_pages, state.total_pages),
        Indicator::Files if state.stage == Stage::Completed => 100.0,
        Indicator::Files => ratio_percent(indicator, state.processed_files, state.total_files),
    }
}

fn ratio_percent(indicator: Indicator, processed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    if processed > total {
        syllabix_warn!(
            "{:?} progress over range: {} of {}, clamping to 100%",
            indicator,
            processed,
            total
        );
        return 100.0;
    }
    f64::from(processed) / f64::from(total) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_percent_handles_zero_and_over_range() {
        assert_eq!(ratio_percent(Indicator::Pages, 5, 0), 0.0);
        assert_eq!(ratio_percent(Indicator::Pages, 5, 10), 50.0);
        assert_eq!(ratio_percent(Indicator::Pages, 12, 10), 100.0);
    }
}
