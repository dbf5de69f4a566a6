//! Sketch Profile Faces
//!
//! This crate provides:
//! - 2D sketch documents with lines, arcs, circles and Bézier segments
//! - Extraction of connected entity paths
//! - Even-odd planar union of the sampled paths with vertex provenance tags
//! - Reconstruction of the union's regions from the exact source curves
//! - Abstract CAD kernel traits for turning the faces into B-rep shapes

pub mod clip;
pub mod kernel;
pub mod profile;
pub mod sketch;

// Re-exports for convenience
pub use clip::{ClipEngine, ContourNode, ContourTree, PlanarClipper, TaggedPath, TaggedPoint};
pub use kernel::{
    Axis3D, CadError, CadKernel, CadResult, Compound, ExactEdge, Face, NullKernel, Shape, Wire,
    default_kernel,
};
pub use profile::{
    Direction, FaceBuilder, ProfileFaces, VertexInfo, VertexTag, build_faces,
    build_faces_with_offset,
};
pub use sketch::{
    Curve, Edge, EndPoint, Entity, Node, Path, Paths, Sketch, SketchError, SketchResult, Workplane,
};

#[cfg(feature = "truck")]
pub use kernel::TruckKernel;
