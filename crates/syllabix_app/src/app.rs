use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use syllabix_client::{ClientEvent, StreamHandle};
use syllabix_core::{
    update, ConnectionStatus, JobView, Msg, ProcessingState, Stage, ViewSettings, UNKNOWN_FAILURE,
};
use syllabix_logging::{syllabix_debug, syllabix_info};

use crate::effects::EffectRunner;
use crate::ui::render::render;
use crate::ui::terminal::TerminalView;

/// Tick while an animation is running.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Tick while waiting on the stream.
const IDLE_INTERVAL: Duration = Duration::from_millis(50);

/// Uploads `files` and returns the new job id.
pub fn upload(handle: &StreamHandle, files: &[PathBuf]) -> anyhow::Result<String> {
    let receipt = handle.upload(files).context("upload failed")?;
    for file in &receipt.files {
        println!("  {} ({} pages)", file.filename, file.page_count);
    }
    if !receipt.message.is_empty() {
        println!("{}", receipt.message);
    }
    println!("Job {}", receipt.job_id);
    Ok(receipt.job_id)
}

/// Streams one job to the terminal until it ends and the bars settle.
pub fn watch(
    handle: &StreamHandle,
    job_id: &str,
    settings: ViewSettings,
) -> anyhow::Result<ProcessingState> {
    syllabix_info!("Watching job {}", job_id);
    let stream = handle.subscribe(job_id);
    let mut runner = EffectRunner::new(stream.subscription().clone());
    let mut terminal = TerminalView::new();
    let mut view = JobView::new(job_id, settings);

    loop {
        syllabix_logging::next_frame();

        while let Some(event) = stream.try_recv() {
            view = dispatch(view, client_msg(event, Instant::now()), &mut runner);
        }
        for (indicator, generation) in runner.due_frames() {
            let msg = Msg::Frame {
                indicator,
                generation,
                at: Instant::now(),
            };
            view = dispatch(view, msg, &mut runner);
        }

        if view.consume_dirty() {
            terminal.apply(render(&view.view()));
        }
        if view.is_settled() {
            break;
        }

        thread::sleep(if runner.has_pending_frames() {
            FRAME_INTERVAL
        } else {
            IDLE_INTERVAL
        });
    }

    let result = outcome(&view);
    dispatch(view, Msg::ViewClosed, &mut runner);
    terminal.finish();
    result
}

fn dispatch(view: JobView, msg: Msg, runner: &mut EffectRunner) -> JobView {
    let (view, effects) = update(view, msg);
    if !effects.is_empty() {
        syllabix_debug!("Running {} effect(s)", effects.len());
    }
    runner.enqueue(effects);
    view
}

fn client_msg(event: ClientEvent, at: Instant) -> Msg {
    match event {
        ClientEvent::Opened => Msg::ChannelOpened,
        ClientEvent::Message(event) => Msg::Received { event, at },
        ClientEvent::Malformed { reason } => Msg::Malformed { reason },
        ClientEvent::Reconnecting { attempt, delay } => Msg::Reconnecting { attempt, delay },
        ClientEvent::Failed(err) => Msg::ChannelFailed {
            reason: err.to_string(),
        },
        ClientEvent::Closed => Msg::ChannelClosed,
    }
}

/// Maps the settled view to the command's result.
fn outcome(view: &JobView) -> anyhow::Result<ProcessingState> {
    let state = view.processing().clone();
    match state.stage {
        Stage::Completed => Ok(state),
        Stage::Failed => bail!(
            "job {} failed: {}",
            view.job_id(),
            state.error.as_deref().unwrap_or(UNKNOWN_FAILURE)
        ),
        stage => match view.view().connection {
            ConnectionStatus::Disconnected { reason } => {
                bail!("lost the stream for job {} during {}: {}", view.job_id(), stage, reason)
            }
            _ => bail!("stream for job {} closed during {}", view.job_id(), stage),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syllabix_core::StreamEvent;

    fn settled(events: Vec<Msg>) -> JobView {
        let mut view = JobView::new("job-9", ViewSettings::default());
        for msg in events {
            view = update(view, msg).0;
        }
        view
    }

    #[test]
    fn client_events_map_to_messages() {
        let at = Instant::now();
        assert_eq!(client_msg(ClientEvent::Opened, at), Msg::ChannelOpened);
        assert_eq!(client_msg(ClientEvent::Closed, at), Msg::ChannelClosed);
        assert_eq!(
            client_msg(
                ClientEvent::Message(StreamEvent::stage_change(Stage::Structuring)),
                at
            ),
            Msg::Received {
                event: StreamEvent::stage_change(Stage::Structuring),
                at
            }
        );
        assert_eq!(
            client_msg(
                ClientEvent::Reconnecting {
                    attempt: 2,
                    delay: Duration::from_secs(1)
                },
                at
            ),
            Msg::Reconnecting {
                attempt: 2,
                delay: Duration::from_secs(1)
            }
        );
    }

    #[test]
    fn completed_job_is_success() {
        let view = settled(vec![
            Msg::Received {
                event: StreamEvent::stage_change(Stage::Completed),
                at: Instant::now(),
            },
            Msg::ChannelClosed,
        ]);
        assert_eq!(outcome(&view).unwrap().stage, Stage::Completed);
    }

    #[test]
    fn failed_job_reports_error_text() {
        let view = settled(vec![
            Msg::Received {
                event: StreamEvent::error("OCR failed"),
                at: Instant::now(),
            },
            Msg::ChannelClosed,
        ]);
        let err = outcome(&view).unwrap_err();
        assert_eq!(err.to_string(), "job job-9 failed: OCR failed");
    }

    #[test]
    fn dropped_stream_reports_reason() {
        let view = settled(vec![
            Msg::ChannelFailed {
                reason: "stream ended early".to_string(),
            },
            Msg::ChannelClosed,
        ]);
        let err = outcome(&view).unwrap_err();
        assert_eq!(
            err.to_string(),
            "lost the stream for job job-9 during pending: stream ended early"
        );
    }
}
