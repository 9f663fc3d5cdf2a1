use serde::{Deserialize, Serialize};

use crate::models::Position;

/// Pointer buttons the canvas distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Input delivered to the canvas by whatever front end hosts it.
///
/// Coordinates are screen (viewport) pixels. `Wheel::delta` uses angle units,
/// 120 per notch; positive means away from the user (zoom in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { button: PointerButton, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { button: PointerButton, x: f64, y: f64 },
    Wheel { x: f64, y: f64, delta: f64 },
    KeyPress { key: char },
}

impl InputEvent {
    /// Screen position carried by pointer and wheel events.
    pub fn screen_position(&self) -> Option<Position> {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some(Position::new(x, y)),
            Self::KeyPress { .. } => None,
        }
    }
}

/// Cursor the host should show after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorShape {
    Default,
    Grabbing,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewResponse {
    /// Whether the canvas consumed the event.
    pub handled: bool,
    /// Cursor change requested by the event, if any.
    pub cursor: Option<CursorShape>,
}

impl ViewResponse {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            cursor: None,
        }
    }

    pub fn with_cursor(cursor: CursorShape) -> Self {
        Self {
            handled: true,
            cursor: Some(cursor),
        }
    }
}

/// Keyboard shortcuts understood by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    ZoomIn,
    ZoomOut,
    Reset,
    Noop,
}

pub fn action_for_key(key: char) -> ViewAction {
    match key {
        '+' | '=' => ViewAction::ZoomIn,
        '-' => ViewAction::ZoomOut,
        '0' => ViewAction::Reset,
        _ => ViewAction::Noop,
    }
}
