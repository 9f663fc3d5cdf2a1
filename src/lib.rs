//! Cushions: split markdown notes into paragraph nodes, arrange them on a
//! pan/zoom canvas with positions kept in a sidecar file, and publish them as
//! cards on a Trello board.

pub mod api;
pub mod canvas;
pub mod document;
pub mod error;
pub mod layout;
pub mod models;
pub mod settings;
pub mod trello;
pub mod upload;
pub mod workspace;

pub use error::CushionsError;
