//! Background publishing of a document as kanban cards.
//!
//! A run walks Reading → EnsuringBoard → EnsuringList → CreatingCards → Done,
//! dropping to Error from any stage. Everything the interactive side learns
//! about a run arrives as [`UploadEvent`]s on an unbounded channel; there is no
//! other shared state. A run cannot be cancelled once started. Dropping the
//! receiver only silences it.

mod monitor;
mod slot;
mod title;

pub use monitor::*;
pub use slot::*;
pub use title::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::document::read_paragraphs;
use crate::error::CushionsError;
use crate::models::{UploadEvent, UploadState, UploadSummary};
use crate::trello::TrelloClient;

pub const DEFAULT_BOARD_NAME: &str = "Proofreading Kanban 🌱";
pub const DEFAULT_LIST_NAME: &str = "To Review 🌅";

/// Delays between cards, so a driving UI can follow along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub after_create: Duration,
    pub after_skip: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_create: Duration::from_millis(600),
            after_skip: Duration::from_millis(150),
        }
    }
}

impl Pacing {
    /// No delays at all.
    pub fn none() -> Self {
        Self {
            after_create: Duration::ZERO,
            after_skip: Duration::ZERO,
        }
    }
}

/// What to publish and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub board_name: String,
    pub list_name: String,
}

impl UploadRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            board_name: DEFAULT_BOARD_NAME.to_string(),
            list_name: DEFAULT_LIST_NAME.to_string(),
        }
    }

    pub fn with_board(mut self, name: impl Into<String>) -> Self {
        self.board_name = name.into();
        self
    }

    pub fn with_list(mut self, name: impl Into<String>) -> Self {
        self.list_name = name.into();
        self
    }
}

pub struct UploadPipeline {
    client: TrelloClient,
    pacing: Pacing,
    events: UnboundedSender<UploadEvent>,
}

impl UploadPipeline {
    /// Create a pipeline and the receiving end of its event channel.
    pub fn new(client: TrelloClient, pacing: Pacing) -> (Self, UnboundedReceiver<UploadEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                client,
                pacing,
                events,
            },
            receiver,
        )
    }

    /// Run to completion, reporting the outcome both as the return value and
    /// as a final `Finished`/`Failed` event.
    pub async fn run(self, request: UploadRequest) -> Result<UploadSummary, CushionsError> {
        match self.execute(&request).await {
            Ok(summary) => {
                tracing::info!(
                    "Upload of {} finished: {} created, {} skipped",
                    request.path.display(),
                    summary.created,
                    summary.skipped
                );
                self.emit(UploadEvent::Finished(summary.clone()));
                Ok(summary)
            }
            Err(e) => {
                tracing::error!("Upload of {} failed: {}", request.path.display(), e);
                self.enter(UploadState::Error);
                self.emit(UploadEvent::Failed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn execute(&self, request: &UploadRequest) -> Result<UploadSummary, CushionsError> {
        if !self.client.credentials().is_complete() {
            return Err(CushionsError::Credentials(
                "Trello API key or token is missing".to_string(),
            ));
        }

        self.enter(UploadState::Reading);
        self.status(format!("Reading {}...", display_name(&request.path)));
        let paragraphs = read_paragraphs(&request.path)?;
        if paragraphs.is_empty() {
            return Err(CushionsError::EmptyDocument(request.path.clone()));
        }
        let total = paragraphs.len();
        self.emit(UploadEvent::Total { total });

        self.enter(UploadState::EnsuringBoard);
        if !self.client.verify_credentials().await? {
            return Err(CushionsError::Credentials(
                "Trello rejected the API key or token".to_string(),
            ));
        }
        self.status(format!("Preparing board '{}'...", request.board_name));
        let board = self.client.ensure_board(&request.board_name).await?;

        self.enter(UploadState::EnsuringList);
        self.status(format!("Preparing list '{}'...", request.list_name));
        let list = self.client.ensure_list(&board.id, &request.list_name).await?;

        self.enter(UploadState::CreatingCards);
        let mut existing = self.client.list_card_names(&list.id).await?;
        tracing::debug!("List '{}' already holds {} cards", list.name, existing.len());

        let mut created = 0;
        let mut skipped = 0;
        for (i, paragraph) in paragraphs.iter().enumerate() {
            let current = i + 1;
            let title = derive_title(paragraph, current);

            let pause = if existing.contains(&title) {
                skipped += 1;
                self.emit(UploadEvent::Progress { current, total });
                self.status(format!("Skipped existing card {}/{}: {}", current, total, title));
                self.pacing.after_skip
            } else {
                self.client.create_card(&list.id, &title, paragraph).await?;
                created += 1;
                self.emit(UploadEvent::Progress { current, total });
                self.status(format!("Created card {}/{}: {}", current, total, title));
                existing.insert(title);
                self.pacing.after_create
            };

            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        self.enter(UploadState::Done);
        Ok(UploadSummary {
            created,
            skipped,
            board_url: board.url,
        })
    }

    fn enter(&self, state: UploadState) {
        tracing::debug!("Upload state: {}", state.as_str());
        self.emit(UploadEvent::State { state });
    }

    fn status(&self, message: String) {
        self.emit(UploadEvent::Status { message });
    }

    /// Send errors mean the receiver is gone; the run carries on regardless.
    fn emit(&self, event: UploadEvent) {
        let _ = self.events.send(event);
    }
}

/// Claim `slot` and run the pipeline on a background task.
///
/// Fails with [`CushionsError::UploadInProgress`] while another upload holds
/// the slot. The slot frees itself when the task ends.
pub fn spawn_upload(
    slot: &UploadSlot,
    pipeline: UploadPipeline,
    request: UploadRequest,
) -> Result<JoinHandle<Result<UploadSummary, CushionsError>>, CushionsError> {
    let guard = slot.try_acquire()?;
    Ok(tokio::spawn(async move {
        let _guard = guard;
        pipeline.run(request).await
    }))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
