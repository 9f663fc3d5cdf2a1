use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::models::{UploadEvent, UploadProgress, UploadState, UploadSummary};

/// What the interactive context knows about the latest upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadSnapshot {
    pub job_id: Option<Uuid>,
    pub state: UploadState,
    pub progress: UploadProgress,
    pub summary: Option<UploadSummary>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl UploadSnapshot {
    pub fn started(job_id: Uuid) -> Self {
        Self {
            job_id: Some(job_id),
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Fold one event into the snapshot.
    pub fn apply(&mut self, event: &UploadEvent) {
        match event {
            UploadEvent::State { state } => self.state = *state,
            UploadEvent::Total { total } => self.progress.total = *total,
            UploadEvent::Progress { current, total } => {
                self.progress.current = *current;
                self.progress.total = *total;
            }
            UploadEvent::Status { message } => self.progress.status = message.clone(),
            UploadEvent::Finished(summary) => {
                self.state = UploadState::Done;
                self.summary = Some(summary.clone());
                self.finished_at = Some(Utc::now());
            }
            UploadEvent::Failed { message } => {
                self.state = UploadState::Error;
                self.error = Some(message.clone());
                self.finished_at = Some(Utc::now());
            }
        }
    }
}

/// Shared snapshot fed from an upload's event channel.
#[derive(Debug, Clone, Default)]
pub struct UploadMonitor {
    inner: Arc<Mutex<UploadSnapshot>>,
}

impl UploadMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        self.inner.lock().expect("upload monitor lock poisoned").clone()
    }

    /// Start tracking a new job, forgetting the previous one.
    pub fn reset(&self, job_id: Uuid) {
        *self.inner.lock().expect("upload monitor lock poisoned") = UploadSnapshot::started(job_id);
    }

    /// Fold an event from `job_id` into the snapshot. Events from a job
    /// other than the one being tracked are ignored; returns whether the
    /// event was applied.
    pub fn apply(&self, job_id: Uuid, event: &UploadEvent) -> bool {
        let mut snapshot = self.inner.lock().expect("upload monitor lock poisoned");
        if snapshot.job_id != Some(job_id) {
            tracing::debug!("Ignoring event from stale upload {}: {:?}", job_id, event);
            return false;
        }
        snapshot.apply(event);
        true
    }

    /// Drain `events` of `job_id` into the snapshot until the sender side
    /// closes.
    pub async fn follow(&self, job_id: Uuid, mut events: UnboundedReceiver<UploadEvent>) {
        while let Some(event) = events.recv().await {
            tracing::debug!("Upload {} event: {:?}", job_id, event);
            self.apply(job_id, &event);
        }
    }
}
