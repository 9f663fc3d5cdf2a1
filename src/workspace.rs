//! The interactive context: the open document and the canvas showing it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::canvas::{Canvas, NodeBoard};
use crate::document::read_paragraphs;
use crate::error::CushionsError;
use crate::layout::{load_layout, save_layout, sidecar_path};
use crate::models::Node;
use crate::settings::Settings;

/// Document extensions the workspace reopens on startup.
const REOPEN_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Outcome of [`Workspace::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    pub path: PathBuf,
    pub sidecar: PathBuf,
    pub layout_saved: bool,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    document: Option<PathBuf>,
    canvas: Canvas,
}

impl Default for Workspace {
    fn default() -> Self {
        let mut canvas = Canvas::default();
        canvas.set_board(NodeBoard::welcome());
        Self {
            document: None,
            canvas,
        }
    }
}

impl Workspace {
    /// Empty workspace showing the welcome node.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Split `path` into nodes, place them from its sidecar and show them.
    ///
    /// The current board is kept when the document cannot be read or has no
    /// content left after filtering.
    pub fn open(&mut self, path: &Path) -> Result<&[Node], CushionsError> {
        let paragraphs = read_paragraphs(path)?;
        if paragraphs.is_empty() {
            return Err(CushionsError::EmptyDocument(path.to_path_buf()));
        }

        let saved = load_layout(path);
        let mut board = NodeBoard::default();
        board.load_document(&paragraphs, &saved);
        tracing::info!(
            "Opened {} with {} nodes ({} saved positions)",
            path.display(),
            board.len(),
            saved.len()
        );

        self.canvas.set_board(board);
        self.document = Some(path.to_path_buf());
        Ok(self.canvas.board().nodes())
    }

    /// Write the board text back to the document, then its layout sidecar.
    ///
    /// A failed document write is an error. A failed sidecar write is only
    /// reported through `layout_saved`.
    pub fn save(&self) -> Result<SavedDocument, CushionsError> {
        let path = self.document.as_deref().ok_or(CushionsError::NoDocument)?;
        let board = self.canvas.board();

        fs::write(path, board.export_text()).map_err(|e| CushionsError::file(path, e))?;
        let layout_saved = save_layout(path, &board.export_layout());

        Ok(SavedDocument {
            path: path.to_path_buf(),
            sidecar: sidecar_path(path),
            layout_saved,
        })
    }

    /// Reopen the last document recorded in `settings`.
    ///
    /// A stale entry (missing file, unsupported extension, unreadable or empty
    /// document) is cleared and the welcome node stays. Returns whether a
    /// document was opened.
    pub fn restore_last_opened(&mut self, settings: &Settings) -> bool {
        let Some(path) = settings.last_opened_file() else {
            return false;
        };

        if path.is_file() && has_reopen_extension(&path) {
            match self.open(&path) {
                Ok(_) => return true,
                Err(e) => tracing::warn!("Could not reopen {}: {}", path.display(), e),
            }
        } else {
            tracing::debug!("Last opened file {} is gone", path.display());
        }

        if let Err(e) = settings.clear_last_opened_file() {
            tracing::warn!("Failed to clear last opened file: {:#}", e);
        }
        false
    }
}

fn has_reopen_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            REOPEN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::WELCOME_TEXT;

    #[test]
    fn starts_with_welcome_node() {
        let workspace = Workspace::new();
        assert!(workspace.document().is_none());
        let nodes = workspace.canvas().board().nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text, WELCOME_TEXT);
    }

    #[test]
    fn save_without_document_fails() {
        let workspace = Workspace::new();
        assert!(matches!(workspace.save(), Err(CushionsError::NoDocument)));
    }

    #[test]
    fn reopen_extensions() {
        assert!(has_reopen_extension(Path::new("notes.md")));
        assert!(has_reopen_extension(Path::new("notes.TXT")));
        assert!(!has_reopen_extension(Path::new("notes.pdf")));
        assert!(!has_reopen_extension(Path::new("notes")));
    }
}
