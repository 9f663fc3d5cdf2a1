//! Document ingestion: paragraph splitting and content hashing.

mod hash;
mod splitter;

pub use hash::content_hash;
pub use splitter::split_paragraphs;

use std::path::Path;

use crate::error::CushionsError;

/// Read a UTF-8 document and split it into paragraphs.
///
/// An empty result is returned as-is; callers decide whether that is an error.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>, CushionsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CushionsError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_paragraphs(&raw))
}
