//! Toolkit-independent canvas: a pan/zoom view over a board of paragraph
//! nodes, driven by a small closed set of input events.

mod board;
mod input;
mod view;

pub use board::*;
pub use input::*;
pub use view::*;

use crate::models::Position;

#[derive(Debug, Clone, Copy)]
struct NodeDrag {
    node_id: u32,
    last_world: Position,
}

/// The view and the board it shows, with left-button node dragging on top
/// of the view's pan and zoom handling.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    view: CanvasView,
    board: NodeBoard,
    drag: Option<NodeDrag>,
}

impl Canvas {
    pub fn new(view: CanvasView, board: NodeBoard) -> Self {
        Self {
            view,
            board,
            drag: None,
        }
    }

    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CanvasView {
        &mut self.view
    }

    pub fn board(&self) -> &NodeBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut NodeBoard {
        &mut self.board
    }

    /// Swap in a new board, dropping any drag in progress.
    pub fn set_board(&mut self, board: NodeBoard) {
        self.drag = None;
        self.board = board;
    }

    pub fn dragged_node(&self) -> Option<u32> {
        self.drag.map(|d| d.node_id)
    }

    pub fn dispatch(&mut self, event: &InputEvent) -> ViewResponse {
        match *event {
            InputEvent::PointerDown {
                button: PointerButton::Left,
                x,
                y,
            } if !self.view.is_panning() => self.begin_drag(Position::new(x, y)),
            InputEvent::PointerMove { x, y } if self.drag.is_some() && !self.view.is_panning() => {
                self.drag_to(Position::new(x, y))
            }
            InputEvent::PointerUp {
                button: PointerButton::Left,
                ..
            } if self.drag.is_some() => {
                self.drag = None;
                ViewResponse::with_cursor(CursorShape::Default)
            }
            _ => self.view.handle(event),
        }
    }

    fn begin_drag(&mut self, screen: Position) -> ViewResponse {
        let world = self.view.screen_to_world(screen);
        match self.board.node_at(world) {
            Some(node_id) => {
                self.drag = Some(NodeDrag {
                    node_id,
                    last_world: world,
                });
                ViewResponse::with_cursor(CursorShape::Grabbing)
            }
            None => ViewResponse::ignored(),
        }
    }

    fn drag_to(&mut self, screen: Position) -> ViewResponse {
        let Some(drag) = self.drag.as_mut() else {
            return ViewResponse::ignored();
        };
        let world = self.view.screen_to_world(screen);
        let (dx, dy) = (world.x - drag.last_world.x, world.y - drag.last_world.y);
        drag.last_world = world;
        let node_id = drag.node_id;
        self.board.translate_node(node_id, dx, dy);
        ViewResponse::handled()
    }
}
