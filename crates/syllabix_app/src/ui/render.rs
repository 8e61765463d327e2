use syllabix_core::{
    ConnectionStatus, Indicator, IndicatorView, ProcessingState, ProgressViewModel, Stage,
    StageStatus, StepView, UNKNOWN_FAILURE,
};

/// A line of the terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Row {
    Step(usize),
    Bar(Indicator),
    Detail,
    Connection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Active,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetText {
        row: Row,
        text: String,
        tone: Tone,
    },
    SetBar {
        indicator: Indicator,
        position: u64,
        message: String,
    },
}

/// Translates a view model into draw commands. Pure; the terminal applies them.
pub fn render(view: &ProgressViewModel) -> Vec<DrawCommand> {
    let mut cmds: Vec<DrawCommand> = view
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| step_row(index, step))
        .collect();

    for indicator in Indicator::ALL {
        cmds.push(DrawCommand::SetBar {
            indicator,
            position: bar_position(view.indicator(indicator)),
            message: bar_message(indicator, &view.state),
        });
    }

    let (detail, tone) = detail_line(view);
    cmds.push(DrawCommand::SetText {
        row: Row::Detail,
        text: detail,
        tone,
    });

    let (connection, tone) = connection_line(&view.connection);
    cmds.push(DrawCommand::SetText {
        row: Row::Connection,
        text: connection,
        tone,
    });

    cmds
}

fn step_row(index: usize, step: &StepView) -> DrawCommand {
    let (marker, tone) = match step.status {
        StageStatus::Completed => ("✔", Tone::Done),
        StageStatus::Active => ("▶", Tone::Active),
        StageStatus::Pending => ("·", Tone::Muted),
    };
    DrawCommand::SetText {
        row: Row::Step(index),
        text: format!("{marker} {}", stage_label(step.stage)),
        tone,
    }
}

fn bar_position(indicator: IndicatorView) -> u64 {
    indicator.displayed.clamp(0.0, 100.0).round() as u64
}

fn bar_message(indicator: Indicator, state: &ProcessingState) -> String {
    match indicator {
        Indicator::Pages => format!("Pages {}/{}", state.processed_pages, state.total_pages),
        Indicator::Files => format!("Files {}/{}", state.processed_files, state.total_files),
    }
}

fn detail_line(view: &ProgressViewModel) -> (String, Tone) {
    let state = &view.state;
    match state.stage {
        Stage::Failed => (
            format!(
                "Processing failed: {}",
                state.error.as_deref().unwrap_or(UNKNOWN_FAILURE)
            ),
            Tone::Error,
        ),
        Stage::Completed => ("Processing complete".to_string(), Tone::Done),
        _ => match &state.current_file {
            Some(file) if view.page_counter > 0 => (
                format!("{file}, page {}", view.page_counter),
                Tone::Active,
            ),
            Some(file) => (file.clone(), Tone::Active),
            None => (format!("Job {}: waiting for the runner", view.job_id), Tone::Muted),
        },
    }
}

fn connection_line(connection: &ConnectionStatus) -> (String, Tone) {
    match connection {
        ConnectionStatus::Connecting => ("Connecting...".to_string(), Tone::Muted),
        ConnectionStatus::Live => ("Live".to_string(), Tone::Done),
        ConnectionStatus::Reconnecting { attempt } => {
            (format!("Reconnecting (attempt {attempt})..."), Tone::Active)
        }
        ConnectionStatus::Disconnected { reason } => {
            (format!("Disconnected: {reason}"), Tone::Error)
        }
        ConnectionStatus::Closed => ("Stream closed".to_string(), Tone::Muted),
    }
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Pending => "Waiting",
        Stage::ReadingFiles => "Reading files",
        Stage::ExtractingPages => "Extracting pages",
        Stage::Structuring => "Structuring content",
        Stage::Completed => "Completed",
        Stage::Failed => "Failed",
    }
}
