//! Layout sidecar persistence.
//!
//! Node positions for `notes.md` live in `.notes.md.layout.json` next to it,
//! as a JSON object mapping content hash to `[x, y]`. The document itself is
//! never written here. Every failure is absorbed: a missing, unreadable or
//! malformed sidecar loads as an empty layout, and a failed save reports
//! `false`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{ContentHash, LayoutMap, Position};

/// On-disk shape of one entry.
type RawLayout = BTreeMap<ContentHash, [f64; 2]>;

/// Path of the hidden sidecar file for `document`.
pub fn sidecar_path(document: &Path) -> PathBuf {
    let name = document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sidecar = format!(".{}.layout.json", name);
    match document.parent() {
        Some(parent) => parent.join(sidecar),
        None => PathBuf::from(sidecar),
    }
}

/// Load saved positions for `document`.
pub fn load_layout(document: &Path) -> LayoutMap {
    let path = sidecar_path(document);
    if !path.exists() {
        return LayoutMap::new();
    }
    match try_load(&path) {
        Ok(layout) => {
            tracing::debug!("Loaded {} layout entries from {}", layout.len(), path.display());
            layout
        }
        Err(e) => {
            tracing::warn!("Ignoring layout file {}: {:#}", path.display(), e);
            LayoutMap::new()
        }
    }
}

fn try_load(path: &Path) -> Result<LayoutMap> {
    let content = fs::read_to_string(path).context("Failed to read layout file")?;
    let raw: RawLayout = serde_json::from_str(&content).context("Failed to parse layout file")?;
    Ok(raw
        .into_iter()
        .map(|(hash, [x, y])| (hash, Position::new(x, y)))
        .collect())
}

/// Overwrite the sidecar for `document` with `layout`.
pub fn save_layout(document: &Path, layout: &LayoutMap) -> bool {
    let path = sidecar_path(document);
    match try_save(&path, layout) {
        Ok(()) => {
            tracing::debug!("Saved {} layout entries to {}", layout.len(), path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Could not save layout file {}: {:#}", path.display(), e);
            false
        }
    }
}

fn try_save(path: &Path, layout: &LayoutMap) -> Result<()> {
    let raw: RawLayout = layout
        .iter()
        .map(|(hash, pos)| (hash.clone(), [pos.x, pos.y]))
        .collect();
    let content = serde_json::to_string_pretty(&raw).context("Failed to serialize layout")?;
    fs::write(path, content).context("Failed to write layout file")?;
    Ok(())
}
