//! CAD Kernel trait definitions
//!
//! These traits define the interface a B-rep kernel implements to receive
//! the faces built from a sketch.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::shape::Compound;

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Shape not found: {0}")]
    ShapeNotFound(Uuid),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// Handle to a shape stored inside a kernel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier
    pub id: Uuid,
    /// Internal marker for kernel data (actual data stored in kernel)
    #[serde(skip)]
    has_kernel_data: bool,
}

impl Shape {
    /// Create a new shape handle with the given ID
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            has_kernel_data: false,
        }
    }

    /// Mark that this shape has kernel data
    pub fn with_kernel_data(mut self) -> Self {
        self.has_kernel_data = true;
        self
    }

    /// Check if this shape has kernel data
    pub fn has_kernel_data(&self) -> bool {
        self.has_kernel_data
    }
}

/// Axis of a circle or arc: center point and normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis3D {
    /// Origin point of the axis
    pub origin: DVec3,
    /// Direction of the axis (normalized)
    pub direction: DVec3,
}

impl Axis3D {
    /// Create an axis from origin and direction
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Z axis at origin
    pub fn z() -> Self {
        Self::new(DVec3::ZERO, DVec3::Z)
    }

    /// Same origin, opposite direction
    pub fn flipped(self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
        }
    }
}

/// The main CAD kernel trait
///
/// Implementations turn exact profile geometry into the backend's own
/// B-rep (Truck, or nothing at all).
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Build planar faces with holes and collect them into one compound
    ///
    /// # Arguments
    /// * `compound` - Faces with exact outer and hole wires
    fn make_compound(&self, compound: &Compound) -> CadResult<Shape>;

    /// Number of faces stored for a shape
    ///
    /// # Arguments
    /// * `shape` - A shape returned by this kernel
    fn face_count(&self, shape: &Shape) -> CadResult<usize>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn make_compound(&self, _compound: &Compound) -> CadResult<Shape> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn face_count(&self, _shape: &Shape) -> CadResult<usize> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }
}

/// Get the default CAD kernel based on available features
pub fn default_kernel() -> Box<dyn CadKernel> {
    #[cfg(feature = "truck")]
    {
        Box::new(super::TruckKernel::new())
    }

    #[cfg(not(feature = "truck"))]
    {
        Box::new(NullKernel)
    }
}
