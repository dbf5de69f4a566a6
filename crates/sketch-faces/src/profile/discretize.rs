//! Path discretization
//!
//! Turns a path into a tagged polygon for the clipping engine. Curved
//! elements are subdivided; a line contributes only its start point since
//! its end is the next element's start.

use glam::DVec2;
use std::f64::consts::TAU;

use super::tag::VertexInfo;
use crate::clip::{TaggedPath, TaggedPoint};
use crate::sketch::{Curve, EndPoint, Path, cubic_point};

/// Default number of samples per curved element
pub const DEFAULT_SEGMENTS: u32 = 64;

/// Default sweep below which an arc is treated as a full turn (radians)
pub const DEFAULT_MIN_ARC_SWEEP: f64 = 1e-2;

/// Whether a path can bound a fillable region.
///
/// Eligible paths have at least three elements, or are a lone circle, or
/// contain an arc or Bézier.
pub fn is_eligible(path: &Path<'_>) -> bool {
    if path.len() >= 3 {
        return true;
    }
    if path.len() == 1 && path.edges().all(|e| matches!(e.curve(), Curve::Circle { .. })) {
        return true;
    }
    path.edges().any(|e| e.curve().is_curved())
}

/// Samples paths into tagged polygons
#[derive(Debug, Clone, Copy)]
pub struct Discretizer {
    /// Samples per curved element
    pub segments: u32,
    /// Arc sweeps smaller than this become a full turn
    pub min_arc_sweep: f64,
}

impl Default for Discretizer {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            min_arc_sweep: DEFAULT_MIN_ARC_SWEEP,
        }
    }
}

impl Discretizer {
    /// Create a discretizer
    pub fn new(segments: u32, min_arc_sweep: f64) -> Self {
        assert!(segments > 0, "segment count must be positive");
        Self {
            segments,
            min_arc_sweep,
        }
    }

    /// Discretize a path; every vertex is tagged with `path_index`
    pub fn discretize(&self, path: &Path<'_>, path_index: u32) -> TaggedPath {
        let mut out = Vec::with_capacity(path.len() * self.segments as usize);

        for (iv, (node, edge)) in path.iter().enumerate() {
            let iv = iv as u32;
            let tag = |i: u32| VertexInfo::for_sample(path_index, iv, i, self.segments).pack().raw();

            match *edge.curve() {
                Curve::Circle { center, radius } => {
                    for i in 0..self.segments {
                        let a = TAU * i as f64 / self.segments as f64;
                        let p = edge.transform_point(center + polar(radius, a));
                        out.push(TaggedPoint::new(p, tag(i)));
                    }
                    break;
                }
                Curve::Arc { center, .. } => {
                    let start = node.endpoint_for(edge);
                    let curve = edge.curve();
                    let radius = curve.radius().unwrap_or_default();
                    let a0 = angle(curve.endpoint(start) - center);
                    let a1 = angle(curve.endpoint(start.other()) - center);
                    let step = self.arc_sweep(a0, a1, start) / self.segments as f64;
                    for i in 0..self.segments {
                        let p = edge.transform_point(center + polar(radius, a0 + step * i as f64));
                        out.push(TaggedPoint::new(p, tag(i)));
                    }
                }
                Curve::Bezier { p1, c1, c2, p2 } => {
                    let forward = node.endpoint_for(edge) == EndPoint::First;
                    for i in 0..self.segments {
                        let t = i as f64 / self.segments as f64;
                        let t = if forward { t } else { 1.0 - t };
                        let p = cubic_point(p1, c1, c2, p2, t);
                        out.push(TaggedPoint::new(edge.transform_point(p), tag(i)));
                    }
                }
                Curve::Line { .. } => {
                    let p = edge.point(node.endpoint_for(edge));
                    out.push(TaggedPoint::new(
                        p,
                        VertexInfo::new(path_index, iv, false).pack().raw(),
                    ));
                }
            }
        }

        out
    }

    /// Signed sweep from `a0` to `a1`, positive when walking from the first
    /// endpoint and negative when walking from the second
    pub fn arc_sweep(&self, a0: f64, a1: f64, start: EndPoint) -> f64 {
        let ccw = (a1 - a0).rem_euclid(TAU);
        let sweep = match start {
            EndPoint::First => ccw,
            EndPoint::Second if ccw > 0.0 => ccw - TAU,
            EndPoint::Second => 0.0,
        };
        if sweep.abs() < self.min_arc_sweep {
            TAU
        } else {
            sweep
        }
    }
}

pub(crate) fn angle(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

pub(crate) fn polar(r: f64, phi: f64) -> DVec2 {
    DVec2::new(r * phi.cos(), r * phi.sin())
}
