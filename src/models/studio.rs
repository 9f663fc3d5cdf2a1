use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Node;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadDocumentInput {
    pub path: PathBuf,
}

/// The open document and the nodes it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentView {
    pub path: Option<PathBuf>,
    pub sidecar: Option<PathBuf>,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDocumentResult {
    pub path: PathBuf,
    pub sidecar: PathBuf,
    pub layout_saved: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub slider: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartUploadInput {
    pub path: PathBuf,
    #[serde(default)]
    pub board: Option<String>,
    #[serde(default)]
    pub list: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStarted {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStatus {
    pub valid: bool,
}
