//! Node container and layout engine.
//!
//! The board owns every node on the canvas. Loading a document replaces the
//! whole set; nothing is diffed, because content identity lives in the hash
//! and not in node ids.

use rand::Rng;

use crate::document::content_hash;
use crate::models::{LayoutMap, Node, Position};

/// Footprint of a node, centred on its position.
pub const NODE_WIDTH: f64 = 280.0;
pub const NODE_HEIGHT: f64 = 110.0;

pub const WELCOME_TEXT: &str = "Welcome to your Warm Sketchbook 🌱📝";

/// Where unseen paragraphs land: a random point on a ring around `origin`.
///
/// The radii are always ordered, finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterConfig {
    origin: Position,
    min_radius: f64,
    max_radius: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            origin: Position::ORIGIN,
            min_radius: 180.0,
            max_radius: 850.0,
        }
    }
}

impl ScatterConfig {
    /// A ring between two radii given in either order. Negative radii count
    /// by magnitude and non-finite ones collapse to zero.
    pub fn new(origin: Position, inner: f64, outer: f64) -> Self {
        let (inner, outer) = (ring_radius(inner), ring_radius(outer));
        Self {
            origin,
            min_radius: inner.min(outer),
            max_radius: inner.max(outer),
        }
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn min_radius(&self) -> f64 {
        self.min_radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Position {
        let angle = rng.gen_range(0.0..360.0_f64).to_radians();
        let distance = rng.gen_range(self.min_radius..=self.max_radius);
        Position::new(
            self.origin.x + distance * angle.cos(),
            self.origin.y + distance * angle.sin(),
        )
    }
}

fn ring_radius(radius: f64) -> f64 {
    if radius.is_finite() {
        radius.abs()
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeBoard {
    nodes: Vec<Node>,
    scatter: ScatterConfig,
}

impl NodeBoard {
    pub fn new(scatter: ScatterConfig) -> Self {
        Self {
            nodes: Vec::new(),
            scatter,
        }
    }

    /// A board holding only the welcome node at the origin.
    pub fn welcome() -> Self {
        let mut board = Self::default();
        board.replace_all(vec![Node {
            id: 1,
            text: WELCOME_TEXT.to_string(),
            position: Position::ORIGIN,
        }]);
        board
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Build nodes for `paragraphs` and install them, replacing every
    /// existing node.
    pub fn load_document(&mut self, paragraphs: &[String], saved: &LayoutMap) -> &[Node] {
        self.load_document_with_rng(paragraphs, saved, &mut rand::thread_rng())
    }

    pub fn load_document_with_rng<R: Rng>(
        &mut self,
        paragraphs: &[String],
        saved: &LayoutMap,
        rng: &mut R,
    ) -> &[Node] {
        let nodes = self.build_nodes(paragraphs, saved, rng);
        self.replace_all(nodes);
        &self.nodes
    }

    /// Assign ids from 1 and a position to each paragraph: the saved one when
    /// its hash is known, a random scatter point otherwise.
    pub fn build_nodes<R: Rng>(
        &self,
        paragraphs: &[String],
        saved: &LayoutMap,
        rng: &mut R,
    ) -> Vec<Node> {
        let mut reused = 0;
        let nodes: Vec<Node> = paragraphs
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let position = match saved.get(&content_hash(text)) {
                    Some(pos) => {
                        reused += 1;
                        *pos
                    }
                    None => self.scatter.sample(rng),
                };
                Node {
                    id: i as u32 + 1,
                    text: text.clone(),
                    position,
                }
            })
            .collect();
        tracing::debug!(
            "Placed {} nodes ({} from saved layout)",
            nodes.len(),
            reused
        );
        nodes
    }

    pub fn replace_all(&mut self, mut nodes: Vec<Node>) {
        nodes.sort_by_key(|n| n.id);
        self.nodes = nodes;
    }

    /// Content hash → current position for every node.
    ///
    /// Nodes with identical text share a hash; the one with the highest id
    /// wins.
    pub fn export_layout(&self) -> LayoutMap {
        self.nodes
            .iter()
            .map(|n| (content_hash(&n.text), n.position))
            .collect()
    }

    /// Node texts in id order, separated by blank lines.
    pub fn export_text(&self) -> String {
        let mut ordered: Vec<&Node> = self.nodes.iter().collect();
        ordered.sort_by_key(|n| n.id);
        ordered
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn move_node(&mut self, id: u32, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn translate_node(&mut self, id: u32, dx: f64, dy: f64) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position.x += dx;
                node.position.y += dy;
                true
            }
            None => false,
        }
    }

    /// Topmost node whose footprint contains `world`. Later ids draw on top.
    pub fn node_at(&self, world: Position) -> Option<u32> {
        self.nodes
            .iter()
            .rev()
            .find(|n| {
                (world.x - n.position.x).abs() <= NODE_WIDTH / 2.0
                    && (world.y - n.position.y).abs() <= NODE_HEIGHT / 2.0
            })
            .map(|n| n.id)
    }
}
