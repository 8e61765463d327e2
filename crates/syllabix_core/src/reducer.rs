//! Table-driven merge of stream events into [`ProcessingState`].

use syllabix_logging::syllabix_debug;

use crate::{EventFields, EventKind, ProcessingState, Stage, StreamEvent};

/// Message recorded when an `error` event arrives without text.
pub const UNKNOWN_FAILURE: &str = "processing failed";

/// A [`ProcessingState`] field an event may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Stage,
    TotalFiles,
    ProcessedFiles,
    TotalPages,
    ProcessedPages,
    CurrentFile,
    CurrentPage,
    Error,
}

/// How a field is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// Take the event's value when present, otherwise keep the previous one.
    IfPresent,
    /// Take the event's value, clearing the field when the event omits it.
    PresentOrClear,
    /// Copy the already merged `processed_pages`.
    CopyProcessedPages,
    /// Overwrite with a fixed stage.
    Force(Stage),
    /// Take the event's message, or [`UNKNOWN_FAILURE`].
    MessageOrDefault,
}

pub type MergeRule = (Field, Merge);

const INITIAL_STATUS: &[MergeRule] = &[
    (Field::Stage, Merge::IfPresent),
    (Field::TotalFiles, Merge::IfPresent),
    (Field::ProcessedFiles, Merge::IfPresent),
    (Field::TotalPages, Merge::IfPresent),
    (Field::ProcessedPages, Merge::IfPresent),
    (Field::CurrentFile, Merge::PresentOrClear),
    // Must follow ProcessedPages.
    (Field::CurrentPage, Merge::CopyProcessedPages),
];

const STAGE_CHANGE: &[MergeRule] = &[
    (Field::Stage, Merge::IfPresent),
    (Field::TotalPages, Merge::IfPresent),
    (Field::TotalFiles, Merge::IfPresent),
];

const FILE_CHANGE: &[MergeRule] = &[
    (Field::CurrentFile, Merge::IfPresent),
    (Field::ProcessedFiles, Merge::IfPresent),
    (Field::TotalFiles, Merge::IfPresent),
];

const PAGE_PROGRESS: &[MergeRule] = &[
    (Field::ProcessedPages, Merge::IfPresent),
    (Field::TotalPages, Merge::IfPresent),
    (Field::CurrentPage, Merge::IfPresent),
    (Field::CurrentFile, Merge::IfPresent),
];

const ERROR: &[MergeRule] = &[
    (Field::Error, Merge::MessageOrDefault),
    (Field::Stage, Merge::Force(Stage::Failed)),
];

/// Merge rules applied, in order, for an event kind.
pub fn merge_rules(kind: EventKind) -> &'static [MergeRule] {
    match kind {
        EventKind::InitialStatus => INITIAL_STATUS,
        EventKind::StageChange => STAGE_CHANGE,
        EventKind::FileChange => FILE_CHANGE,
        EventKind::PageProgress => PAGE_PROGRESS,
        EventKind::Error => ERROR,
    }
}

/// Pure reducer: applies one event to the canonical state.
///
/// Once the state is terminal every event is ignored. Events are trusted to
/// arrive in the order the job reached them; nothing is reordered, deduplicated
/// or clamped here.
pub fn reduce(mut state: ProcessingState, event: &StreamEvent) -> ProcessingState {
    if state.is_terminal() {
        syllabix_debug!(
            "Ignoring {} after terminal stage {}",
            event.kind,
            state.stage
        );
        return state;
    }

    for &(field, merge) in merge_rules(event.kind) {
        apply(&mut state, &event.fields, field, merge);
    }
    state
}

fn apply(state: &mut ProcessingState, fields: &EventFields, field: Field, merge: Merge) {
    match field {
        Field::Stage => match merge {
            Merge::Force(stage) => state.stage = stage,
            _ => merge_value(&mut state.stage, fields.stage, merge),
        },
        Field::TotalFiles => merge_value(&mut state.total_files, fields.total_files, merge),
        Field::ProcessedFiles => {
            merge_value(&mut state.processed_files, fields.processed_files, merge)
        }
        Field::TotalPages => merge_value(&mut state.total_pages, fields.total_pages, merge),
        Field::ProcessedPages => {
            merge_value(&mut state.processed_pages, fields.processed_pages, merge)
        }
        Field::CurrentPage => match merge {
            Merge::CopyProcessedPages => state.current_page = state.processed_pages,
            _ => merge_value(&mut state.current_page, fields.current_page, merge),
        },
        Field::CurrentFile => match merge {
            Merge::PresentOrClear => state.current_file = fields.current_file.clone(),
            _ => {
                if let Some(file) = &fields.current_file {
                    state.current_file = Some(file.clone());
                }
            }
        },
        Field::Error => match merge {
            Merge::MessageOrDefault => {
                let message = fields
                    .error
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_FAILURE.to_string());
                state.error = Some(message);
            }
            _ => {
                if let Some(message) = &fields.error {
                    state.error = Some(message.clone());
                }
            }
        },
    }
}

fn merge_value<T: Default>(slot: &mut T, value: Option<T>, merge: Merge) {
    match (value, merge) {
        (Some(value), _) => *slot = value,
        (None, Merge::PresentOrClear) => *slot = T::default(),
        (None, _) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_rules() {
        for kind in [
            EventKind::InitialStatus,
            EventKind::StageChange,
            EventKind::FileChange,
            EventKind::PageProgress,
            EventKind::Error,
        ] {
            assert!(!merge_rules(kind).is_empty(), "{kind} has no rules");
        }
    }

    #[test]
    fn initial_status_copies_processed_pages_after_merging_it() {
        let rules = merge_rules(EventKind::InitialStatus);
        let processed = rules
            .iter()
            .position(|(field, _)| *field == Field::ProcessedPages)
            .unwrap();
        let copied = rules
            .iter()
            .position(|(_, merge)| *merge == Merge::CopyProcessedPages)
            .unwrap();
        assert!(processed < copied);
    }

    #[test]
    fn merge_value_keeps_previous_when_absent() {
        let mut slot = 4u32;
        merge_value(&mut slot, None, Merge::IfPresent);
        assert_eq!(slot, 4);
        merge_value(&mut slot, Some(9), Merge::IfPresent);
        assert_eq!(slot, 9);
        merge_value(&mut slot, None, Merge::PresentOrClear);
        assert_eq!(slot, 0);
    }
}
