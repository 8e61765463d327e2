use syllabix_core::{stage_status, stage_statuses, Stage, StageStatus, PIPELINE};

#[test]
fn extracting_pages_marks_earlier_done_and_later_pending() {
    assert_eq!(
        stage_status(Stage::ExtractingPages, Stage::ReadingFiles),
        StageStatus::Completed
    );
    assert_eq!(
        stage_status(Stage::ExtractingPages, Stage::ExtractingPages),
        StageStatus::Active
    );
    assert_eq!(
        stage_status(Stage::ExtractingPages, Stage::Structuring),
        StageStatus::Pending
    );
}

#[test]
fn pending_and_failed_leave_every_step_pending() {
    for current in [Stage::Pending, Stage::Failed] {
        for (stage, status) in stage_statuses(current) {
            assert_eq!(status, StageStatus::Pending, "{stage} while {current}");
        }
    }
}

#[test]
fn completed_marks_every_step_completed() {
    let statuses = stage_statuses(Stage::Completed);
    assert!(statuses
        .iter()
        .all(|(_, status)| *status == StageStatus::Completed));
}

#[test]
fn statuses_follow_pipeline_order() {
    let stages: Vec<_> = stage_statuses(Stage::Structuring)
        .iter()
        .map(|(stage, _)| *stage)
        .collect();
    assert_eq!(stages, PIPELINE.to_vec());
    assert_eq!(
        stage_statuses(Stage::Structuring).map(|(_, status)| status),
        [
            StageStatus::Completed,
            StageStatus::Completed,
            StageStatus::Active
        ]
    );
}

#[test]
fn stages_outside_pipeline_are_pending() {
    assert_eq!(
        stage_status(Stage::ExtractingPages, Stage::Pending),
        StageStatus::Pending
    );
}
