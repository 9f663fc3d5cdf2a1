use serde::{Deserialize, Serialize};

/// A board on the kanban service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBoard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Shareable short URL, passed through unchanged from the service.
    #[serde(rename = "shortUrl", default)]
    pub url: String,
}

/// A list (column) within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteList {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A card within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCard {
    pub id: String,
    #[serde(default)]
    pub name: String,
}
