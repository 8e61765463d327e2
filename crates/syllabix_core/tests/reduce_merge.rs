use pretty_assertions::assert_eq;
use syllabix_core::{reduce, ProcessingState, Stage, StreamEvent, UNKNOWN_FAILURE};

fn extracting(total_pages: u32, processed_pages: u32) -> ProcessingState {
    ProcessingState {
        stage: Stage::ExtractingPages,
        total_pages,
        processed_pages,
        ..ProcessingState::default()
    }
}

#[test]
fn page_progress_overrides_only_present_fields() {
    let state = extracting(10, 3);

    let next = reduce(state, &StreamEvent::page_progress().processed_pages(7));

    assert_eq!(next.processed_pages, 7);
    assert_eq!(next.total_pages, 10);
    assert_eq!(next.stage, Stage::ExtractingPages);
}

#[test]
fn page_progress_may_update_page_and_file() {
    let state = ProcessingState {
        current_file: Some("a.pdf".to_string()),
        ..extracting(10, 3)
    };

    let next = reduce(
        state,
        &StreamEvent::page_progress()
            .processed_pages(4)
            .current_page(4)
            .current_file("b.pdf"),
    );

    assert_eq!(next.current_page, 4);
    assert_eq!(next.current_file.as_deref(), Some("b.pdf"));

    let next = reduce(next, &StreamEvent::page_progress().processed_pages(5));
    assert_eq!(next.current_file.as_deref(), Some("b.pdf"));
    assert_eq!(next.current_page, 4);
}

#[test]
fn page_progress_ignores_stage_and_file_counts() {
    let state = extracting(10, 3);
    let mut event = StreamEvent::page_progress().processed_pages(4);
    event.fields.stage = Some(Stage::Structuring);
    event.fields.total_files = Some(9);

    let next = reduce(state, &event);

    assert_eq!(next.stage, Stage::ExtractingPages);
    assert_eq!(next.total_files, 0);
}

#[test]
fn initial_status_sets_baseline_and_clears_missing_file() {
    let state = ProcessingState {
        current_file: Some("stale.pdf".to_string()),
        current_page: 9,
        ..ProcessingState::default()
    };

    let next = reduce(
        state,
        &StreamEvent::initial_status()
            .stage(Stage::ExtractingPages)
            .total_files(2)
            .processed_files(1)
            .total_pages(20)
            .processed_pages(12),
    );

    assert_eq!(
        next,
        ProcessingState {
            stage: Stage::ExtractingPages,
            total_files: 2,
            processed_files: 1,
            total_pages: 20,
            processed_pages: 12,
            current_file: None,
            current_page: 12,
            error: None,
        }
    );
}

#[test]
fn initial_status_keeps_present_file() {
    let next = reduce(
        ProcessingState::default(),
        &StreamEvent::initial_status()
            .stage(Stage::ReadingFiles)
            .current_file("exam.pdf"),
    );

    assert_eq!(next.current_file.as_deref(), Some("exam.pdf"));
    assert_eq!(next.current_page, 0);
}

#[test]
fn stage_change_carries_totals() {
    let state = ProcessingState {
        stage: Stage::ReadingFiles,
        total_files: 2,
        ..ProcessingState::default()
    };

    let next = reduce(
        state,
        &StreamEvent::stage_change(Stage::ExtractingPages).total_pages(10),
    );

    assert_eq!(next.stage, Stage::ExtractingPages);
    assert_eq!(next.total_pages, 10);
    assert_eq!(next.total_files, 2);
}

#[test]
fn stage_change_does_not_touch_progress_counters() {
    let state = extracting(10, 6);
    let mut event = StreamEvent::stage_change(Stage::Structuring);
    event.fields.processed_pages = Some(0);
    event.fields.current_file = Some("x.pdf".to_string());

    let next = reduce(state, &event);

    assert_eq!(next.processed_pages, 6);
    assert_eq!(next.current_file, None);
}

#[test]
fn file_change_updates_file_and_counts() {
    let state = ProcessingState {
        total_files: 2,
        ..extracting(10, 4)
    };

    let next = reduce(
        state,
        &StreamEvent::file_change("second.pdf")
            .processed_files(1)
            .total_files(2),
    );

    assert_eq!(next.current_file.as_deref(), Some("second.pdf"));
    assert_eq!(next.processed_files, 1);
    assert_eq!(next.total_files, 2);
    assert_eq!(next.processed_pages, 4);
}

#[test]
fn error_event_fails_the_job_with_message() {
    let next = reduce(extracting(10, 3), &StreamEvent::error("OCR failed"));

    assert_eq!(next.stage, Stage::Failed);
    assert_eq!(next.error.as_deref(), Some("OCR failed"));
    assert_eq!(next.processed_pages, 3);
}

#[test]
fn error_event_without_text_uses_fallback() {
    let mut event = StreamEvent::error("x");
    event.fields.error = None;

    let next = reduce(extracting(10, 3), &event);

    assert_eq!(next.error.as_deref(), Some(UNKNOWN_FAILURE));
}

#[test]
fn nothing_changes_after_failure() {
    let failed = reduce(extracting(10, 3), &StreamEvent::error("OCR failed"));

    let events = [
        StreamEvent::page_progress().processed_pages(9),
        StreamEvent::stage_change(Stage::Structuring),
        StreamEvent::stage_change(Stage::Completed),
        StreamEvent::initial_status().stage(Stage::ReadingFiles),
        StreamEvent::error("second failure"),
    ];
    for event in &events {
        assert_eq!(reduce(failed.clone(), event), failed);
    }
}

#[test]
fn nothing_changes_after_completion() {
    let done = reduce(extracting(10, 10), &StreamEvent::stage_change(Stage::Completed));

    assert_eq!(done.stage, Stage::Completed);
    assert_eq!(reduce(done.clone(), &StreamEvent::error("late")), done);
    assert_eq!(
        reduce(done.clone(), &StreamEvent::page_progress().processed_pages(1)),
        done
    );
}

#[test]
fn out_of_range_values_are_not_clamped() {
    let next = reduce(extracting(10, 3), &StreamEvent::page_progress().processed_pages(12));

    assert_eq!(next.processed_pages, 12);
}
