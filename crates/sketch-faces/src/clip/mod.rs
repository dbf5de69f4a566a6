//! Polygon Clipping
//!
//! The profile builder treats polygon clipping as a black box: a union of
//! polygons whose vertices carry an opaque integer, returning a nested
//! contour tree. Engines must hand every input vertex's value through
//! unchanged and ask the caller what to put on vertices they synthesize.

pub mod planar;

use glam::DVec2;

pub use planar::PlanarClipper;

/// A polygon vertex with an opaque tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedPoint {
    /// Position
    pub pos: DVec2,
    /// Caller-defined value, preserved by the engine
    pub z: i64,
}

impl TaggedPoint {
    /// Create a tagged point
    pub fn new(pos: DVec2, z: i64) -> Self {
        Self { pos, z }
    }
}

/// A closed polygon; the last vertex connects back to the first
pub type TaggedPath = Vec<TaggedPoint>;

/// An edge-edge intersection at which the engine creates a vertex
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// Endpoints of the first edge
    pub e1: [TaggedPoint; 2],
    /// Endpoints of the second edge
    pub e2: [TaggedPoint; 2],
    /// Position of the new vertex
    pub point: DVec2,
}

/// A contour of the union result and the contours nested directly inside it
#[derive(Debug, Clone, Default)]
pub struct ContourNode {
    /// Vertices, filled region on the left
    pub contour: TaggedPath,
    /// Holes are clockwise, outers counter-clockwise
    pub is_hole: bool,
    /// Holes of an outer, or islands of a hole
    pub children: Vec<ContourNode>,
}

impl ContourNode {
    /// Number of contours in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ContourNode::count).sum::<usize>()
    }
}

/// Nested result of a union: outers at the top, then holes, islands, ...
#[derive(Debug, Clone, Default)]
pub struct ContourTree {
    /// Top-level outer contours
    pub roots: Vec<ContourNode>,
}

impl ContourTree {
    /// Total number of contours
    pub fn len(&self) -> usize {
        self.roots.iter().map(ContourNode::count).sum()
    }

    /// Whether the union is empty
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// A polygon clipping backend
pub trait ClipEngine: Send + Sync {
    /// Get the name of this engine
    fn name(&self) -> &str;

    /// Union all subjects with even-odd fill
    ///
    /// # Arguments
    /// * `subjects` - Closed polygons with tagged vertices
    /// * `on_intersection` - Returns the tag for each synthesized vertex
    fn union(
        &self,
        subjects: &[TaggedPath],
        on_intersection: &mut dyn FnMut(&Intersection) -> i64,
    ) -> ContourTree;
}
