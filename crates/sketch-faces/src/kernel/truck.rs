//! Truck CAD Kernel Backend
//!
//! Pure Rust B-Rep kernel using the Truck library.

use glam::DVec3;
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::Mutex;
use uuid::Uuid;

use truck_modeling::{
    Edge as TruckEdge, Face as TruckFace, Point3, Rad, Vector3, Vertex, Wire as TruckWire, builder,
};

use super::{CadError, CadKernel, CadResult, Compound, ExactEdge, Face, Shape, Wire};

/// Truck-based CAD kernel
pub struct TruckKernel {
    /// Storage for face lists (keyed by UUID)
    shapes: Mutex<HashMap<Uuid, Vec<TruckFace>>>,
}

impl TruckKernel {
    /// Create a new Truck kernel
    pub fn new() -> Self {
        Self {
            shapes: Mutex::new(HashMap::new()),
        }
    }

    /// Store faces and return a Shape reference
    fn store_faces(&self, faces: Vec<TruckFace>) -> CadResult<Shape> {
        let id = Uuid::new_v4();
        let mut shapes = self
            .shapes
            .lock()
            .map_err(|_| CadError::OperationFailed("Shape store poisoned".into()))?;
        shapes.insert(id, faces);
        Ok(Shape::new(id).with_kernel_data())
    }

    /// Get the stored faces of a shape
    pub fn faces(&self, shape: &Shape) -> CadResult<Vec<TruckFace>> {
        let shapes = self
            .shapes
            .lock()
            .map_err(|_| CadError::OperationFailed("Shape store poisoned".into()))?;
        shapes
            .get(&shape.id)
            .cloned()
            .ok_or(CadError::ShapeNotFound(shape.id))
    }

    /// Create a wire; consecutive edges share their vertices so the wire
    /// closes on its first vertex
    fn create_wire(&self, wire: &Wire) -> CadResult<TruckWire> {
        if let [ExactEdge::Circle { axis, seam, .. }] = wire.edges.as_slice() {
            let vertex = builder::vertex(point(*seam));
            return Ok(builder::rsweep(
                &vertex,
                point(axis.origin),
                vector(axis.direction),
                Rad(TAU),
            ));
        }

        if wire.is_empty() {
            return Err(CadError::InvalidProfile("Wire has no edges".into()));
        }

        let vertices: Vec<Vertex> = wire
            .edges
            .iter()
            .map(|e| builder::vertex(point(e.start())))
            .collect();

        let n = vertices.len();
        let edges = wire
            .edges
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                let v0 = &vertices[i];
                let v1 = &vertices[(i + 1) % n];
                match edge {
                    ExactEdge::Line { .. } => Ok(builder::line(v0, v1)),
                    ExactEdge::Arc { .. } => Ok(builder::circle_arc(v0, v1, point(edge.midpoint()))),
                    ExactEdge::Bezier { poles } => Ok(builder::bezier(
                        v0,
                        v1,
                        vec![point(poles[1]), point(poles[2])],
                    )),
                    ExactEdge::Circle { .. } => Err(CadError::InvalidProfile(
                        "A full circle must be the only edge of its wire".into(),
                    )),
                }
            })
            .collect::<CadResult<Vec<TruckEdge>>>()?;

        Ok(edges.into())
    }

    /// Create a planar face from an outer wire and its holes
    fn create_face(&self, face: &Face) -> CadResult<TruckFace> {
        let mut wires = Vec::with_capacity(face.holes.len() + 1);
        wires.push(self.create_wire(&face.outer)?);
        for hole in &face.holes {
            wires.push(self.create_wire(hole)?);
        }

        builder::try_attach_plane(&wires)
            .map_err(|e| CadError::OperationFailed(format!("Failed to create face: {:?}", e)))
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for TruckKernel {
    fn name(&self) -> &str {
        "truck"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn make_compound(&self, compound: &Compound) -> CadResult<Shape> {
        let faces = compound
            .iter()
            .map(|face| self.create_face(face))
            .collect::<CadResult<Vec<_>>>()
            .inspect_err(|e| tracing::warn!("Truck face construction failed: {}", e))?;

        self.store_faces(faces)
    }

    fn face_count(&self, shape: &Shape) -> CadResult<usize> {
        let shapes = self
            .shapes
            .lock()
            .map_err(|_| CadError::OperationFailed("Shape store poisoned".into()))?;
        shapes
            .get(&shape.id)
            .map(Vec::len)
            .ok_or(CadError::ShapeNotFound(shape.id))
    }
}

fn point(p: DVec3) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

fn vector(v: DVec3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}
