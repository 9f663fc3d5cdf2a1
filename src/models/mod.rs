//! Domain models for Cushions.
//!
//! # Core Concepts
//!
//! ## Local Entities
//!
//! - [`Node`]: One paragraph placed on the canvas. Its `id` is assigned at load
//!   time and is not stable across reloads; the [`ContentHash`] of its text is.
//! - [`Position`]: A point in canvas (world) coordinates.
//! - [`LayoutMap`]: Saved positions keyed by content hash.
//!
//! ## Remote Entities
//!
//! Kanban objects owned by the remote service and only ever found or created
//! by exact name:
//!
//! - [`RemoteBoard`], [`RemoteList`], [`RemoteCard`]
//!
//! ## Transient Entities
//!
//! - [`UploadProgress`], [`UploadEvent`], [`UploadState`]: live signals from
//!   the background upload task. Nothing here is persisted.
//!
//! ## Studio Payloads
//!
//! - [`LoadDocumentInput`], [`DocumentView`], [`StartUploadInput`] and friends:
//!   request and response bodies of the studio HTTP API.

mod board;
mod node;
mod studio;
mod upload;

pub use board::*;
pub use node::*;
pub use studio::*;
pub use upload::*;
