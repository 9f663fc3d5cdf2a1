//! Pan/zoom viewport.
//!
//! Screen and world coordinates relate through `screen = world * scale - scroll`,
//! where `scroll` is the pan offset in screen pixels.

use serde::{Deserialize, Serialize};

use super::input::{action_for_key, CursorShape, InputEvent, PointerButton, ViewAction, ViewResponse};
use crate::models::Position;

pub const DEFAULT_MIN_ZOOM: f64 = 0.25;
pub const DEFAULT_MAX_ZOOM: f64 = 6.0;
pub const DEFAULT_ZOOM_STEP: f64 = 1.18;
pub const DEFAULT_SENSITIVITY: f64 = 0.0005;
pub const MIN_SENSITIVITY: f64 = 0.0001;
pub const MAX_SENSITIVITY: f64 = 0.0020;
/// Angle units per wheel notch.
pub const WHEEL_NOTCH: f64 = 120.0;

/// How wheel input turns into zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelMode {
    /// One `step` per notch.
    #[default]
    Stepped,
    /// One step of `1 + sensitivity * |delta|`, for touchpads and the
    /// sensitivity slider.
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub step: f64,
    pub sensitivity: f64,
    pub wheel_mode: WheelMode,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            step: DEFAULT_ZOOM_STEP,
            sensitivity: DEFAULT_SENSITIVITY,
            wheel_mode: WheelMode::Stepped,
        }
    }
}

/// Serializable view state for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub scale: f64,
    pub scroll: Position,
    pub panning: bool,
    pub sensitivity: f64,
    pub wheel_mode: WheelMode,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

#[derive(Debug, Clone)]
pub struct CanvasView {
    config: ZoomConfig,
    scale: f64,
    scroll: Position,
    /// Last pointer position while a pan is in progress.
    pan_anchor: Option<Position>,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl CanvasView {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            scale: 1.0,
            scroll: Position::ORIGIN,
            pan_anchor: None,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scroll(&self) -> Position {
        self.scroll
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            scale: self.scale,
            scroll: self.scroll,
            panning: self.is_panning(),
            sensitivity: self.config.sensitivity,
            wheel_mode: self.config.wheel_mode,
            min_zoom: self.config.min_zoom,
            max_zoom: self.config.max_zoom,
        }
    }

    pub fn world_to_screen(&self, world: Position) -> Position {
        Position::new(
            world.x * self.scale - self.scroll.x,
            world.y * self.scale - self.scroll.y,
        )
    }

    pub fn screen_to_world(&self, screen: Position) -> Position {
        Position::new(
            (screen.x + self.scroll.x) / self.scale,
            (screen.y + self.scroll.y) / self.scale,
        )
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, event: &InputEvent) -> ViewResponse {
        match *event {
            InputEvent::PointerDown {
                button: PointerButton::Middle,
                x,
                y,
            } => self.begin_pan(Position::new(x, y)),
            InputEvent::PointerMove { x, y } => self.pan_to(Position::new(x, y)),
            InputEvent::PointerUp {
                button: PointerButton::Middle,
                ..
            } => self.end_pan(),
            InputEvent::Wheel { x, y, delta } => self.wheel(Position::new(x, y), delta),
            InputEvent::KeyPress { key } => self.key(key),
            _ => ViewResponse::ignored(),
        }
    }

    fn begin_pan(&mut self, at: Position) -> ViewResponse {
        if self.is_panning() {
            return ViewResponse::ignored();
        }
        self.pan_anchor = Some(at);
        ViewResponse::with_cursor(CursorShape::Grabbing)
    }

    fn pan_to(&mut self, at: Position) -> ViewResponse {
        let Some(anchor) = self.pan_anchor else {
            return ViewResponse::ignored();
        };
        // Dragging right moves the content right, so the scroll offset shrinks.
        self.scroll.x -= at.x - anchor.x;
        self.scroll.y -= at.y - anchor.y;
        self.pan_anchor = Some(at);
        ViewResponse::handled()
    }

    fn end_pan(&mut self) -> ViewResponse {
        if self.pan_anchor.take().is_none() {
            return ViewResponse::ignored();
        }
        ViewResponse::with_cursor(CursorShape::Default)
    }

    fn wheel(&mut self, at: Position, delta: f64) -> ViewResponse {
        if delta == 0.0 || !delta.is_finite() {
            return ViewResponse::ignored();
        }
        let zoom_in = delta > 0.0;
        match self.config.wheel_mode {
            WheelMode::Stepped => {
                let notches = ((delta.abs() / WHEEL_NOTCH).round() as u32).max(1);
                for _ in 0..notches {
                    let applied = if zoom_in {
                        self.zoom_in_at(at)
                    } else {
                        self.zoom_out_at(at)
                    };
                    if !applied {
                        break;
                    }
                }
            }
            WheelMode::Smooth => {
                let factor = 1.0 + self.config.sensitivity * delta.abs();
                let factor = if zoom_in { factor } else { 1.0 / factor };
                self.apply_zoom(factor, at);
            }
        }
        ViewResponse::handled()
    }

    fn key(&mut self, key: char) -> ViewResponse {
        match action_for_key(key) {
            ViewAction::ZoomIn => {
                self.zoom_in_at(Position::ORIGIN);
            }
            ViewAction::ZoomOut => {
                self.zoom_out_at(Position::ORIGIN);
            }
            ViewAction::Reset => self.reset(),
            ViewAction::Noop => return ViewResponse::ignored(),
        }
        ViewResponse::handled()
    }

    /// Zoom in one step around a screen point. Returns whether the step applied.
    pub fn zoom_in_at(&mut self, anchor: Position) -> bool {
        self.apply_zoom(self.config.step, anchor)
    }

    /// Zoom out one step around a screen point. Returns whether the step applied.
    pub fn zoom_out_at(&mut self, anchor: Position) -> bool {
        self.apply_zoom(1.0 / self.config.step, anchor)
    }

    /// Multiply the scale by `factor`, keeping the world point under `anchor`
    /// fixed on screen. A step that would leave `[min_zoom, max_zoom]` is
    /// rejected outright rather than clamped.
    pub fn apply_zoom(&mut self, factor: f64, anchor: Position) -> bool {
        let next = self.scale * factor;
        if (factor > 1.0 && next > self.config.max_zoom)
            || (factor < 1.0 && next < self.config.min_zoom)
        {
            tracing::trace!("Zoom step to {:.3} rejected", next);
            return false;
        }

        let world = self.screen_to_world(anchor);
        self.scale = next;
        self.scroll = Position::new(world.x * next - anchor.x, world.y * next - anchor.y);
        true
    }

    /// Back to scale 1.0 and origin pan.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.scroll = Position::ORIGIN;
    }

    /// Set wheel sensitivity, clamped to the supported range. Returns the
    /// value actually stored.
    pub fn set_sensitivity(&mut self, sensitivity: f64) -> f64 {
        self.config.sensitivity = sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
        self.config.sensitivity
    }

    /// Slider positions 1..=20 map to `0.0001..=0.0020`.
    pub fn set_sensitivity_slider(&mut self, slider: u8) -> f64 {
        self.set_sensitivity(f64::from(slider.clamp(1, 20)) * 0.0001)
    }

    pub fn set_wheel_mode(&mut self, mode: WheelMode) {
        self.config.wheel_mode = mode;
    }
}
