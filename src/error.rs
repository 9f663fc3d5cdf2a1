//! Error taxonomy shared by the local editing and remote publishing paths.

use std::path::PathBuf;

use thiserror::Error;

use crate::trello::ClientError;

/// Errors surfaced to the interactive context.
///
/// Layout sidecar problems never appear here: the layout store absorbs them
/// and falls back to an empty layout.
#[derive(Debug, Error)]
pub enum CushionsError {
    #[error("Could not access {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No content found in {} after filtering", .0.display())]
    EmptyDocument(PathBuf),

    #[error("Trello credentials problem: {0}")]
    Credentials(String),

    #[error("Trello request failed: {0}")]
    Remote(#[from] ClientError),

    #[error("An upload is already running")]
    UploadInProgress,

    #[error("No document is open")]
    NoDocument,
}

impl CushionsError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
