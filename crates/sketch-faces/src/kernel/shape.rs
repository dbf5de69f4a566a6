//! Exact boundary geometry
//!
//! Kernel-neutral edges, wires and faces. The profile builder produces these;
//! a [`CadKernel`](super::CadKernel) turns them into its own B-rep.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::Axis3D;

/// An analytic edge in 3D
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExactEdge {
    /// Straight segment
    Line {
        /// Start point
        start: DVec3,
        /// End point
        end: DVec3,
    },

    /// Circular arc, counter-clockwise around `axis.direction`
    Arc {
        /// Center and normal
        axis: Axis3D,
        /// Radius
        radius: f64,
        /// Start point
        start: DVec3,
        /// End point
        end: DVec3,
    },

    /// Full circle starting and ending at `seam`
    Circle {
        /// Center and normal
        axis: Axis3D,
        /// Radius
        radius: f64,
        /// Point on the circle where it begins
        seam: DVec3,
    },

    /// Cubic Bézier from `poles[0]` to `poles[3]`
    Bezier {
        /// Start, two controls, end
        poles: [DVec3; 4],
    },
}

impl ExactEdge {
    /// Start point
    pub fn start(&self) -> DVec3 {
        match self {
            ExactEdge::Line { start, .. } | ExactEdge::Arc { start, .. } => *start,
            ExactEdge::Circle { seam, .. } => *seam,
            ExactEdge::Bezier { poles } => poles[0],
        }
    }

    /// End point
    pub fn end(&self) -> DVec3 {
        match self {
            ExactEdge::Line { end, .. } | ExactEdge::Arc { end, .. } => *end,
            ExactEdge::Circle { seam, .. } => *seam,
            ExactEdge::Bezier { poles } => poles[3],
        }
    }

    /// Evaluate at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> DVec3 {
        match *self {
            ExactEdge::Line { start, end } => start.lerp(end, t),
            ExactEdge::Arc {
                axis,
                radius,
                start,
                end,
            } => {
                let (u, v) = plane_basis(&axis, start);
                let rel = end - axis.origin;
                let mut sweep = rel.dot(v).atan2(rel.dot(u)).rem_euclid(TAU);
                if sweep <= f64::EPSILON {
                    sweep = TAU;
                }
                let phi = sweep * t;
                axis.origin + (u * phi.cos() + v * phi.sin()) * radius
            }
            ExactEdge::Circle { axis, radius, seam } => {
                let (u, v) = plane_basis(&axis, seam);
                let phi = TAU * t;
                axis.origin + (u * phi.cos() + v * phi.sin()) * radius
            }
            ExactEdge::Bezier { poles } => {
                let s = 1.0 - t;
                poles[0] * (s * s * s)
                    + poles[1] * (3.0 * s * s * t)
                    + poles[2] * (3.0 * s * t * t)
                    + poles[3] * (t * t * t)
            }
        }
    }

    /// Point halfway along the edge
    pub fn midpoint(&self) -> DVec3 {
        self.point_at(0.5)
    }

    /// Points a polygonal approximation of the edge starts with.
    ///
    /// A line gives its start; curves give `segments` points at
    /// `t = i / segments`. The end point is left out; it is the start of the
    /// next edge in a closed wire.
    pub fn sample(&self, segments: u32) -> Vec<DVec3> {
        match self {
            ExactEdge::Line { start, .. } => vec![*start],
            _ => (0..segments)
                .map(|i| self.point_at(i as f64 / segments as f64))
                .collect(),
        }
    }

    /// Whether the edge is a line
    pub fn is_line(&self) -> bool {
        matches!(self, ExactEdge::Line { .. })
    }
}

/// Orthonormal in-plane basis with `u` pointing at `reference`
fn plane_basis(axis: &Axis3D, reference: DVec3) -> (DVec3, DVec3) {
    let u = (reference - axis.origin).normalize_or_zero();
    let v = axis.direction.cross(u);
    (u, v)
}

/// An ordered chain of edges, closed when the last edge ends at the first
/// edge's start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    /// Edges in traversal order
    pub edges: Vec<ExactEdge>,
}

impl Wire {
    /// Create an empty wire
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge
    pub fn push(&mut self, edge: ExactEdge) {
        self.edges.push(edge);
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the wire has no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether consecutive edges meet within `tolerance`, including the last
    /// and the first
    pub fn is_closed(&self, tolerance: f64) -> bool {
        let n = self.edges.len();
        n > 0
            && (0..n).all(|i| {
                self.edges[i]
                    .end()
                    .distance(self.edges[(i + 1) % n].start())
                    <= tolerance
            })
    }

    /// Concatenated [`ExactEdge::sample`] of all edges
    pub fn sample(&self, segments: u32) -> Vec<DVec3> {
        self.edges.iter().flat_map(|e| e.sample(segments)).collect()
    }
}

/// A planar region: one outer boundary and any number of holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Outer boundary
    pub outer: Wire,
    /// Inner boundaries
    pub holes: Vec<Wire>,
}

impl Face {
    /// Create a face without holes
    pub fn new(outer: Wire) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Add an inner boundary
    pub fn add_hole(&mut self, hole: Wire) {
        self.holes.push(hole);
    }
}

/// A collection of faces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    /// Faces in the order they were added
    pub faces: Vec<Face>,
}

impl Compound {
    /// Create an empty compound
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a face
    pub fn add(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Number of faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether there are no faces
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterate over the faces
    pub fn iter(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter()
    }
}
