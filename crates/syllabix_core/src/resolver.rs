use std::fmt;

use crate::Stage;

/// Displayed pipeline steps, in order.
pub const PIPELINE: [Stage; 3] = [Stage::ReadingFiles, Stage::ExtractingPages, Stage::Structuring];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageStatus {
    Pending,
    Active,
    Completed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageStatus::Pending => "pending",
            StageStatus::Active => "active",
            StageStatus::Completed => "completed",
        })
    }
}

/// Status of `queried` given the job's `current` stage.
///
/// Stages outside [`PIPELINE`] (pending, failed) leave every step pending;
/// a completed job marks every step completed.
pub fn stage_status(current: Stage, queried: Stage) -> StageStatus {
    if current == Stage::Completed {
        return StageStatus::Completed;
    }
    let Some(queried_index) = pipeline_index(queried) else {
        return StageStatus::Pending;
    };
    let Some(current_index) = pipeline_index(current) else {
        return StageStatus::Pending;
    };
    match queried_index.cmp(&current_index) {
        std::cmp::Ordering::Less => StageStatus::Completed,
        std::cmp::Ordering::Equal => StageStatus::Active,
        std::cmp::Ordering::Greater => StageStatus::Pending,
    }
}

/// Status of every [`PIPELINE`] step, in order.
pub fn stage_statuses(current: Stage) -> [(Stage, StageStatus); 3] {
    PIPELINE.map(|stage| (stage, stage_status(current, stage)))
}

fn pipeline_index(stage: Stage) -> Option<usize> {
    PIPELINE.iter().position(|candidate| *candidate == stage)
}
