use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::Stage;

/// Tag carried by every push-channel message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    InitialStatus,
    StageChange,
    FileChange,
    PageProgress,
    Error,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::InitialStatus => "initial_status",
            EventKind::StageChange => "stage_change",
            EventKind::FileChange => "file_change",
            EventKind::PageProgress => "page_progress",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional payload of a stream event. `None` means "unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EventFields {
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub total_files: Option<u32>,
    #[serde(default)]
    pub processed_files: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub processed_pages: Option<u32>,
    #[serde(default)]
    pub current_file: Option<String>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One message received from the job's push channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub kind: EventKind,
    pub fields: EventFields,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not a valid stream event: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: EventKind,
    #[serde(flatten)]
    fields: EventFields,
}

impl StreamEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            fields: EventFields::default(),
        }
    }

    /// Decodes one JSON payload. Unknown `type` values or stage names are errors;
    /// unknown extra keys are ignored.
    pub fn from_json(payload: &str) -> Result<Self, DecodeError> {
        let wire: WireMessage = serde_json::from_str(payload)?;
        Ok(Self {
            kind: wire.kind,
            fields: wire.fields,
        })
    }

    pub fn initial_status() -> Self {
        Self::new(EventKind::InitialStatus)
    }

    pub fn stage_change(stage: Stage) -> Self {
        Self::new(EventKind::StageChange).stage(stage)
    }

    pub fn file_change(current_file: impl Into<String>) -> Self {
        Self::new(EventKind::FileChange).current_file(current_file)
    }

    pub fn page_progress() -> Self {
        Self::new(EventKind::PageProgress)
    }

    pub fn error(message: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::Error);
        event.fields.error = Some(message.into());
        event
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.fields.stage = Some(stage);
        self
    }

    pub fn total_files(mut self, value: u32) -> Self {
        self.fields.total_files = Some(value);
        self
    }

    pub fn processed_files(mut self, value: u32) -> Self {
        self.fields.processed_files = Some(value);
        self
    }

    pub fn total_pages(mut self, value: u32) -> Self {
        self.fields.total_pages = Some(value);
        self
    }

    pub fn processed_pages(mut self, value: u32) -> Self {
        self.fields.processed_pages = Some(value);
        self
    }

    pub fn current_file(mut self, value: impl Into<String>) -> Self {
        self.fields.current_file = Some(value.into());
        self
    }

    pub fn current_page(mut self, value: u32) -> Self {
        self.fields.current_page = Some(value);
        self
    }

    /// True when applying this event ends the job.
    pub fn is_terminal(&self) -> bool {
        match self.kind {
            EventKind::Error => true,
            _ => self.fields.stage.is_some_and(Stage::is_terminal),
        }
    }
}
