//! Sketch Document
//!
//! Workplanes and the parametric 2D curves drawn on them. Entities are
//! immutable while faces are being built; the document owns them and paths
//! only borrow.

pub mod path;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use path::{Edge, EndPoint, Node, Path, Paths};

/// Sketch-related errors
#[derive(Debug, Clone, Error)]
pub enum SketchError {
    #[error("Workplane not found: {0}")]
    WorkplaneNotFound(Uuid),

    #[error("Entity not found: {0}")]
    EntityNotFound(Uuid),
}

/// Result type for sketch operations
pub type SketchResult<T> = Result<T, SketchError>;

/// A plane in 3D space that 2D sketch coordinates live on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workplane {
    /// Unique identifier
    pub id: Uuid,
    /// Origin of the plane in world space
    pub origin: DVec3,
    /// Direction of the sketch X axis
    pub x_axis: DVec3,
    /// Direction of the sketch Y axis
    pub y_axis: DVec3,
    /// Plane normal (`x_axis × y_axis`)
    pub normal: DVec3,
}

impl Workplane {
    /// Create a workplane from an origin and two in-plane axes
    pub fn new(origin: DVec3, x_axis: DVec3, y_axis: DVec3) -> Self {
        let x_axis = x_axis.normalize();
        let y_axis = y_axis.normalize();
        Self {
            id: Uuid::new_v4(),
            origin,
            x_axis,
            y_axis,
            normal: x_axis.cross(y_axis).normalize(),
        }
    }

    /// XY plane at origin
    pub fn xy() -> Self {
        Self::new(DVec3::ZERO, DVec3::X, DVec3::Y)
    }

    /// XZ plane at origin
    pub fn xz() -> Self {
        Self::new(DVec3::ZERO, DVec3::X, DVec3::Z)
    }

    /// YZ plane at origin
    pub fn yz() -> Self {
        Self::new(DVec3::ZERO, DVec3::Y, DVec3::Z)
    }

    /// Move the plane origin
    pub fn with_origin(mut self, origin: DVec3) -> Self {
        self.origin = origin;
        self
    }

    /// Map a point in sketch coordinates to world space
    pub fn to_world(&self, p: DVec2) -> DVec3 {
        self.origin + self.x_axis * p.x + self.y_axis * p.y
    }
}

/// Geometry of a sketch entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// Straight segment
    Line {
        /// Start point
        from: DVec2,
        /// End point
        to: DVec2,
    },

    /// Circular arc, counter-clockwise from `from` to `to`
    Arc {
        /// Center of the arc
        center: DVec2,
        /// Start point (also defines the radius)
        from: DVec2,
        /// End point
        to: DVec2,
    },

    /// Full circle
    Circle {
        /// Center of the circle
        center: DVec2,
        /// Radius
        radius: f64,
    },

    /// Cubic Bézier segment
    Bezier {
        /// Start point
        p1: DVec2,
        /// Control point next to `p1`
        c1: DVec2,
        /// Control point next to `p2`
        c2: DVec2,
        /// End point
        p2: DVec2,
    },
}

impl Curve {
    /// Get the point at one of the two logical endpoints.
    ///
    /// A circle has no endpoints; its seam (angle 0) is returned for both.
    pub fn endpoint(&self, end: EndPoint) -> DVec2 {
        match (self, end) {
            (Curve::Line { from, .. }, EndPoint::First) => *from,
            (Curve::Line { to, .. }, EndPoint::Second) => *to,
            (Curve::Arc { from, .. }, EndPoint::First) => *from,
            (Curve::Arc { to, .. }, EndPoint::Second) => *to,
            (Curve::Circle { center, radius }, _) => *center + DVec2::new(*radius, 0.0),
            (Curve::Bezier { p1, .. }, EndPoint::First) => *p1,
            (Curve::Bezier { p2, .. }, EndPoint::Second) => *p2,
        }
    }

    /// Center of arcs and circles
    pub fn center(&self) -> Option<DVec2> {
        match self {
            Curve::Arc { center, .. } | Curve::Circle { center, .. } => Some(*center),
            _ => None,
        }
    }

    /// Radius of arcs and circles
    pub fn radius(&self) -> Option<f64> {
        match self {
            Curve::Arc { center, from, .. } => Some((*from - *center).length()),
            Curve::Circle { radius, .. } => Some(*radius),
            _ => None,
        }
    }

    /// Arcs and Béziers
    pub fn is_curved(&self) -> bool {
        matches!(self, Curve::Arc { .. } | Curve::Bezier { .. })
    }
}

/// Evaluate the cubic Bézier `p1, c1, c2, p2` at `t` in `[0, 1]`
pub fn cubic_point(p1: DVec2, c1: DVec2, c2: DVec2, p2: DVec2, t: f64) -> DVec2 {
    let s = 1.0 - t;
    p1 * (s * s * s) + c1 * (3.0 * s * s * t) + c2 * (3.0 * s * t * t) + p2 * (t * t * t)
}

/// An entity placed in a sketch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: Uuid,
    /// Workplane the entity is drawn on
    pub workplane: Uuid,
    /// Group the entity belongs to
    pub group: Uuid,
    /// Construction geometry never forms profiles
    #[serde(default)]
    pub construction: bool,
    /// Geometry
    pub curve: Curve,
}

/// A sketch document holding workplanes and entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sketch {
    /// Name of the sketch
    pub name: String,
    workplanes: Vec<Workplane>,
    entities: Vec<Entity>,
}

impl Sketch {
    /// Create an empty sketch
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a workplane and return its ID
    pub fn add_workplane(&mut self, workplane: Workplane) -> Uuid {
        let id = workplane.id;
        self.workplanes.push(workplane);
        id
    }

    /// Get a workplane by ID
    pub fn workplane(&self, id: Uuid) -> SketchResult<&Workplane> {
        self.workplanes
            .iter()
            .find(|w| w.id == id)
            .ok_or(SketchError::WorkplaneNotFound(id))
    }

    /// Add an entity with the given geometry and return its ID
    pub fn add_entity(&mut self, workplane: Uuid, group: Uuid, curve: Curve) -> Uuid {
        let id = Uuid::new_v4();
        self.entities.push(Entity {
            id,
            workplane,
            group,
            construction: false,
            curve,
        });
        id
    }

    /// Add a line segment
    pub fn add_line(&mut self, workplane: Uuid, group: Uuid, from: DVec2, to: DVec2) -> Uuid {
        self.add_entity(workplane, group, Curve::Line { from, to })
    }

    /// Add a counter-clockwise arc
    pub fn add_arc(
        &mut self,
        workplane: Uuid,
        group: Uuid,
        center: DVec2,
        from: DVec2,
        to: DVec2,
    ) -> Uuid {
        self.add_entity(workplane, group, Curve::Arc { center, from, to })
    }

    /// Add a full circle
    pub fn add_circle(&mut self, workplane: Uuid, group: Uuid, center: DVec2, radius: f64) -> Uuid {
        self.add_entity(workplane, group, Curve::Circle { center, radius })
    }

    /// Add a cubic Bézier
    pub fn add_bezier(
        &mut self,
        workplane: Uuid,
        group: Uuid,
        [p1, c1, c2, p2]: [DVec2; 4],
    ) -> Uuid {
        self.add_entity(workplane, group, Curve::Bezier { p1, c1, c2, p2 })
    }

    /// Add a closed polygon of line segments and return the line IDs
    pub fn add_polygon(&mut self, workplane: Uuid, group: Uuid, points: &[DVec2]) -> Vec<Uuid> {
        (0..points.len())
            .map(|i| {
                let next = (i + 1) % points.len();
                self.add_line(workplane, group, points[i], points[next])
            })
            .collect()
    }

    /// Mark an entity as construction geometry
    pub fn set_construction(&mut self, id: Uuid, construction: bool) -> SketchResult<()> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(SketchError::EntityNotFound(id))?;
        entity.construction = construction;
        Ok(())
    }

    /// Get an entity by ID
    pub fn entity(&self, id: Uuid) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Iterate over all entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}
