use serde::{Deserialize, Serialize};

/// Stage of an upload run.
///
/// `Error` is reachable from every other state; `Done` only from
/// `CreatingCards`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    #[default]
    Idle,
    Reading,
    EnsuringBoard,
    EnsuringList,
    CreatingCards,
    Done,
    Error,
}

impl UploadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::EnsuringBoard => "ensuring_board",
            Self::EnsuringList => "ensuring_list",
            Self::CreatingCards => "creating_cards",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Whether a run in this state has stopped for good.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// Live progress counters for a running upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub current: usize,
    pub total: usize,
    pub status: String,
}

/// Outcome of a finished upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Cards actually created (skipped duplicates excluded).
    pub created: usize,
    pub skipped: usize,
    pub board_url: String,
}

/// Message sent from the background upload task to the interactive context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    State { state: UploadState },
    Total { total: usize },
    Progress { current: usize, total: usize },
    Status { message: String },
    Finished(UploadSummary),
    Failed { message: String },
}
