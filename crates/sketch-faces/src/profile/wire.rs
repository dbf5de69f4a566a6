//! Exact wire reconstruction
//!
//! Rebuilds a union contour from the analytic curves of its source path
//! instead of the polygon it was sampled into.

use glam::{DVec2, DVec3};

use super::contour::Direction;
use crate::kernel::{Axis3D, ExactEdge, Wire};
use crate::sketch::{Curve, EndPoint, Path, Workplane};

/// Maps sketch coordinates into the output space
#[derive(Clone, Copy)]
pub struct Placement<'a> {
    workplane: &'a Workplane,
    point_transform: &'a dyn Fn(DVec3) -> DVec3,
    normal_transform: &'a dyn Fn(DVec3) -> DVec3,
}

impl<'a> Placement<'a> {
    /// Create a placement on `workplane` followed by the given transforms
    pub fn new(
        workplane: &'a Workplane,
        point_transform: &'a dyn Fn(DVec3) -> DVec3,
        normal_transform: &'a dyn Fn(DVec3) -> DVec3,
    ) -> Self {
        Self {
            workplane,
            point_transform,
            normal_transform,
        }
    }

    /// Place a point given in sketch coordinates
    pub fn point(&self, p: DVec2) -> DVec3 {
        (self.point_transform)(self.workplane.to_world(p))
    }

    /// Placed workplane normal
    pub fn normal(&self) -> DVec3 {
        (self.normal_transform)(self.workplane.normal)
    }
}

impl std::fmt::Debug for Placement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placement")
            .field("workplane", &self.workplane.id)
            .finish_non_exhaustive()
    }
}

/// Build the exact wire for `path`, walked in `direction`.
///
/// A path made of a single arc or circle becomes a full circle whose normal
/// is flipped for holes. Everything else is walked element by element;
/// walking backwards swaps each edge's start and end. Open paths are closed
/// with a straight edge.
pub fn reconstruct(path: &Path<'_>, direction: Direction, placement: &Placement<'_>, hole: bool) -> Wire {
    if path.len() == 1
        && let Some((_, edge)) = path.get(0)
    {
        let curve = edge.curve();
        if let (Some(center), Some(radius)) = (curve.center(), curve.radius()) {
            let axis = Axis3D::new(placement.point(edge.transform_point(center)), placement.normal());
            return Wire {
                edges: vec![ExactEdge::Circle {
                    axis: if hole { axis.flipped() } else { axis },
                    radius,
                    seam: placement.point(edge.transform_point(center + DVec2::new(radius, 0.0))),
                }],
            };
        }
    }

    let indices: Vec<usize> = match direction {
        Direction::Forward => (0..path.len()).collect(),
        Direction::Reverse => (0..path.len()).rev().collect(),
    };

    let mut wire = Wire::new();
    for k in indices {
        let Some((node, edge)) = path.get(k) else {
            continue;
        };
        let start = match direction {
            Direction::Forward => node.endpoint_for(edge),
            Direction::Reverse => node.endpoint_for(edge).other(),
        };
        let end = start.other();
        let pa = placement.point(edge.point(start));
        let pb = placement.point(edge.point(end));

        let exact = match *edge.curve() {
            Curve::Arc { center, .. } => {
                let axis = Axis3D::new(placement.point(edge.transform_point(center)), placement.normal());
                ExactEdge::Arc {
                    axis: match start {
                        EndPoint::First => axis,
                        EndPoint::Second => axis.flipped(),
                    },
                    radius: edge.curve().radius().unwrap_or_default(),
                    start: pa,
                    end: pb,
                }
            }
            Curve::Bezier { c1, c2, .. } => {
                let (ca, cb) = match start {
                    EndPoint::First => (c1, c2),
                    EndPoint::Second => (c2, c1),
                };
                ExactEdge::Bezier {
                    poles: [
                        pa,
                        placement.point(edge.transform_point(ca)),
                        placement.point(edge.transform_point(cb)),
                        pb,
                    ],
                }
            }
            _ => ExactEdge::Line { start: pa, end: pb },
        };
        wire.push(exact);
    }

    if !path.is_closed()
        && let (Some(first), Some(last)) = (wire.edges.first(), wire.edges.last())
        && first.start() != last.end()
    {
        let chord = ExactEdge::Line {
            start: last.end(),
            end: first.start(),
        };
        wire.push(chord);
    }

    wire
}
