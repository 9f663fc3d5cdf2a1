use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Hex digest of a paragraph's exact text.
///
/// Two paragraphs with identical text share a hash and therefore share a
/// saved layout slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in canvas (world) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Saved node positions keyed by content hash.
pub type LayoutMap = BTreeMap<ContentHash, Position>;

/// A paragraph placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Sequential id assigned at load time, starting at 1.
    pub id: u32,
    /// Full paragraph text.
    pub text: String,
    pub position: Position,
}

impl Node {
    /// Short preview of the text for list views.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.text.chars().count() > max_chars {
            let head: String = self.text.chars().take(max_chars).collect();
            format!("{}…", head)
        } else {
            self.text.clone()
        }
    }
}
