//! Profile Faces
//!
//! Builds planar faces from the closed paths of a sketch. Paths are sampled
//! into tagged polygons, merged with an even-odd union, and every region of
//! the result that traces back to a single path is rebuilt from that path's
//! exact curves. Regions stitched together from several paths are dropped.

pub mod contour;
pub mod discretize;
pub mod tag;
pub mod wire;

use glam::DVec3;
use uuid::Uuid;

use crate::clip::{ClipEngine, ContourNode, PlanarClipper, TaggedPath, TaggedPoint};
use crate::kernel::{CadKernel, CadResult, Compound, Face, Shape, Wire};
use crate::sketch::{Path, Paths, Sketch, SketchResult, Workplane};

pub use contour::{Direction, is_attributable, resolve_direction, source_path};
pub use discretize::{DEFAULT_MIN_ARC_SWEEP, DEFAULT_SEGMENTS, Discretizer, is_eligible};
pub use tag::{VertexInfo, VertexTag};
pub use wire::{Placement, reconstruct};

/// Faces built from one workplane/group of a sketch
#[derive(Debug, Clone, Default)]
pub struct ProfileFaces {
    compound: Compound,
    face_count: usize,
    has_hole: bool,
}

impl ProfileFaces {
    /// All faces
    pub fn compound(&self) -> &Compound {
        &self.compound
    }

    /// Take the faces
    pub fn into_compound(self) -> Compound {
        self.compound
    }

    /// Number of faces built
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Whether any face received a hole
    pub fn has_hole(&self) -> bool {
        self.has_hole
    }

    /// Whether no face could be built
    pub fn is_empty(&self) -> bool {
        self.face_count == 0
    }

    /// Hand the faces to a B-rep kernel
    pub fn make_shape(&self, kernel: &dyn CadKernel) -> CadResult<Shape> {
        kernel.make_compound(&self.compound)
    }
}

/// Planar face builder
pub struct FaceBuilder {
    /// Sampling of curved elements
    discretizer: Discretizer,
    /// Union backend
    engine: Box<dyn ClipEngine>,
}

impl Default for FaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceBuilder {
    /// Create a builder with default parameters and the built-in engine
    pub fn new() -> Self {
        Self {
            discretizer: Discretizer::default(),
            engine: Box::new(PlanarClipper::new()),
        }
    }

    /// Set the number of samples per curved element
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.discretizer.segments = segments.max(1);
        self
    }

    /// Set the sweep (radians) below which an arc counts as a full turn
    pub fn with_min_arc_sweep(mut self, min_arc_sweep: f64) -> Self {
        self.discretizer.min_arc_sweep = min_arc_sweep;
        self
    }

    /// Use another clipping backend
    pub fn with_clip_engine(mut self, engine: Box<dyn ClipEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Build faces for the entities of `group` on `workplane`.
    ///
    /// Points are mapped through the workplane and then `point_transform`;
    /// the workplane normal goes through `normal_transform`.
    pub fn build(
        &self,
        sketch: &Sketch,
        workplane: Uuid,
        group: Uuid,
        point_transform: impl Fn(DVec3) -> DVec3,
        normal_transform: impl Fn(DVec3) -> DVec3,
    ) -> SketchResult<ProfileFaces> {
        let wp = sketch.workplane(workplane)?;
        let paths = Paths::from_sketch(sketch, workplane, group)?;
        Ok(self.build_paths(wp, &paths, &point_transform, &normal_transform))
    }

    /// Build faces translated by `offset`
    pub fn build_with_offset(
        &self,
        sketch: &Sketch,
        workplane: Uuid,
        group: Uuid,
        offset: DVec3,
    ) -> SketchResult<ProfileFaces> {
        self.build(sketch, workplane, group, move |p| p + offset, |n| n)
    }

    /// Build faces from paths extracted elsewhere
    pub fn build_paths(
        &self,
        workplane: &Workplane,
        paths: &Paths<'_>,
        point_transform: &dyn Fn(DVec3) -> DVec3,
        normal_transform: &dyn Fn(DVec3) -> DVec3,
    ) -> ProfileFaces {
        let eligible: Vec<&Path<'_>> = paths.iter().filter(|p| is_eligible(p)).collect();
        let subjects: Vec<TaggedPath> = eligible
            .iter()
            .enumerate()
            .map(|(i, path)| self.discretizer.discretize(path, i as u32))
            .collect();

        let tree = self
            .engine
            .union(&subjects, &mut |_| VertexTag::INVALID.raw());

        tracing::debug!(
            "Union of {} paths ({} skipped) with {}: {} contours",
            eligible.len(),
            paths.len() - eligible.len(),
            self.engine.name(),
            tree.len()
        );

        let mut visitor = TreeVisitor {
            paths: &eligible,
            placement: Placement::new(workplane, point_transform, normal_transform),
            faces: ProfileFaces::default(),
            dropped: 0,
        };
        for root in &tree.roots {
            visitor.visit_outer(root);
        }

        tracing::debug!(
            "Built {} faces, {} contours dropped",
            visitor.faces.face_count,
            visitor.dropped
        );

        visitor.faces
    }
}

/// Build faces with the default builder
pub fn build_faces(
    sketch: &Sketch,
    workplane: Uuid,
    group: Uuid,
    point_transform: impl Fn(DVec3) -> DVec3,
    normal_transform: impl Fn(DVec3) -> DVec3,
) -> SketchResult<ProfileFaces> {
    FaceBuilder::new().build(sketch, workplane, group, point_transform, normal_transform)
}

/// Build faces translated by `offset` with the default builder
pub fn build_faces_with_offset(
    sketch: &Sketch,
    workplane: Uuid,
    group: Uuid,
    offset: DVec3,
) -> SketchResult<ProfileFaces> {
    FaceBuilder::new().build_with_offset(sketch, workplane, group, offset)
}

/// Walks the contour tree and collects faces
struct TreeVisitor<'p, 'a> {
    paths: &'p [&'p Path<'a>],
    placement: Placement<'p>,
    faces: ProfileFaces,
    dropped: usize,
}

impl TreeVisitor<'_, '_> {
    fn wire_for(&mut self, contour: &[TaggedPoint], hole: bool) -> Option<Wire> {
        let Some(path) = source_path(contour).and_then(|i| self.paths.get(i as usize)) else {
            self.dropped += 1;
            tracing::debug!(
                "Dropping {} contour of {} vertices spanning several paths",
                if hole { "hole" } else { "outer" },
                contour.len()
            );
            return None;
        };
        Some(reconstruct(
            path,
            resolve_direction(contour),
            &self.placement,
            hole,
        ))
    }

    /// Islands under the holes of an outer are visited even when the outer
    /// itself cannot be attributed
    fn visit_outer(&mut self, node: &ContourNode) {
        debug_assert!(!node.is_hole);

        let mut face = self.wire_for(&node.contour, false).map(Face::new);

        for hole in &node.children {
            debug_assert!(hole.is_hole);
            if let Some(face) = face.as_mut()
                && let Some(wire) = self.wire_for(&hole.contour, true)
            {
                face.add_hole(wire);
                self.faces.has_hole = true;
            }
            for island in &hole.children {
                self.visit_outer(island);
            }
        }

        if let Some(face) = face {
            self.faces.face_count += 1;
            self.faces.compound.add(face);
        }
    }
}
