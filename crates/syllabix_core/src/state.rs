use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque job handle returned by the upload step.
pub type JobId = String;

/// Pipeline phase reported by the job runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No event received yet.
    #[default]
    Pending,
    ReadingFiles,
    ExtractingPages,
    Structuring,
    Completed,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Pending => "pending",
            Stage::ReadingFiles => "reading_files",
            Stage::ExtractingPages => "extracting_pages",
            Stage::Structuring => "structuring",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical job state reconstructed from the event stream.
///
/// Only [`crate::reduce`] produces new values of this type once a view is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessingState {
    pub stage: Stage,
    pub total_files: u32,
    pub processed_files: u32,
    pub total_pages: u32,
    pub processed_pages: u32,
    pub current_file: Option<String>,
    pub current_page: u32,
    pub error: Option<String>,
}

impl ProcessingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }
}
