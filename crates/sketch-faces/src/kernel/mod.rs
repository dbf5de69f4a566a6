//! CAD Kernel Abstraction
//!
//! Exact profile geometry and the kernels that consume it.

pub mod shape;
mod traits;
#[cfg(feature = "truck")]
mod truck;

pub use shape::{Compound, ExactEdge, Face, Wire};
pub use traits::{Axis3D, CadError, CadKernel, CadResult, NullKernel, Shape, default_kernel};
#[cfg(feature = "truck")]
pub use truck::TruckKernel;
